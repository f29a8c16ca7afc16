//! Canvas position to voice parameters.
//!
//! Height maps to pitch (top of the canvas is highest), width maps to
//! loudness. Both are plain linear maps: coordinates outside the canvas
//! extrapolate rather than clamp.

use super::{VoiceParams, Waveform};
use crate::error::RegistryError;
use crate::geometry::Point;

/// Lowest frequency, reached at the bottom edge.
pub const MIN_FREQUENCY: f32 = 32.0;
/// Width of the pitch range in Hz; the top edge sits at 523 Hz.
pub const FREQUENCY_SPAN: f32 = 491.0;
/// Gain at the right edge is `1 / GAIN_DIVISOR`.
pub const GAIN_DIVISOR: f32 = 10.0;

/// Inverted linear map of `y` over `[0, canvas_height]` to `[523, 32]` Hz.
#[inline]
pub fn frequency_from_y(y: f32, canvas_height: f32) -> f32 {
    FREQUENCY_SPAN - (y / canvas_height) * FREQUENCY_SPAN + MIN_FREQUENCY
}

/// Linear map of `x` over `[0, canvas_width]` to `[0, 0.1]`.
#[inline]
pub fn gain_from_x(x: f32, canvas_width: f32) -> f32 {
    x / (canvas_width * GAIN_DIVISOR)
}

/// Drawing surface dimensions in canvas units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Result<Self, RegistryError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(RegistryError::InvalidCanvas { width, height })
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self { width: 600.0, height: 600.0 }
    }
}

/// Maps positions on a fixed canvas to voice parameters.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SoundMapper {
    canvas: Canvas,
}

impl SoundMapper {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn frequency(&self, y: f32) -> f32 {
        frequency_from_y(y, self.canvas.height)
    }

    pub fn gain(&self, x: f32) -> f32 {
        gain_from_x(x, self.canvas.width)
    }

    pub fn params_for(&self, position: Point, waveform: Waveform) -> VoiceParams {
        VoiceParams {
            frequency: self.frequency(position.y),
            gain: self.gain(position.x),
            waveform,
        }
    }
}
