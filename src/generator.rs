//! Random shape generator: a preset outline, a palette color and a position
//! kept clear of the canvas edges.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::audio::{Canvas, VoiceBackend, Waveform};
use crate::error::RegistryError;
use crate::geometry::{Outline, Point};
use crate::registry::ShapeRegistry;
use crate::shape::{Color, ShapeId, ShapeKind, ShapeStyle};

pub const DEFAULT_PALETTE: [Color; 3] = [
    Color::rgb(0xF6, 0x2A, 0x6B),
    Color::rgb(0x82, 0xF1, 0xD6),
    Color::rgb(0xCF, 0x93, 0xDF),
];

pub const DEFAULT_MARGIN_X: u32 = 60;
pub const DEFAULT_MARGIN_Y: u32 = 90;

/// Per-preset waveform replacements; unset kinds keep their own.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WaveformOverrides {
    pub triangle: Option<Waveform>,
    pub diamond: Option<Waveform>,
    pub square: Option<Waveform>,
}

impl WaveformOverrides {
    /// Every kind plays `waveform`.
    pub fn all(waveform: Waveform) -> Self {
        Self { triangle: Some(waveform), diamond: Some(waveform), square: Some(waveform) }
    }

    pub fn waveform_for(&self, kind: ShapeKind) -> Waveform {
        let chosen = match kind {
            ShapeKind::Triangle => self.triangle,
            ShapeKind::Diamond => self.diamond,
            ShapeKind::Square => self.square,
        };
        chosen.unwrap_or_else(|| kind.waveform())
    }
}

/// A shape ready to be added to a registry.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub position: Point,
    pub outline: Outline,
    pub style: ShapeStyle,
}

pub struct ShapeGenerator<R: Rng> {
    rng: R,
    canvas: Canvas,
    palette: Vec<Color>,
    margin_x: u32,
    margin_y: u32,
    waveforms: WaveformOverrides,
}

impl<R: Rng> ShapeGenerator<R> {
    pub fn new(rng: R, canvas: Canvas) -> Self {
        Self {
            rng,
            canvas,
            palette: DEFAULT_PALETTE.to_vec(),
            margin_x: DEFAULT_MARGIN_X,
            margin_y: DEFAULT_MARGIN_Y,
            waveforms: WaveformOverrides::default(),
        }
    }

    /// Replace the palette. An empty palette keeps the current one.
    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    pub fn with_margins(mut self, margin_x: u32, margin_y: u32) -> Self {
        self.margin_x = margin_x;
        self.margin_y = margin_y;
        self
    }

    pub fn with_waveforms(mut self, waveforms: WaveformOverrides) -> Self {
        self.waveforms = waveforms;
        self
    }

    pub fn generate(&mut self) -> ShapeSpec {
        let kind = *ShapeKind::ALL.choose(&mut self.rng).unwrap_or(&ShapeKind::Square);
        let color = *self.palette.choose(&mut self.rng).unwrap_or(&DEFAULT_PALETTE[0]);
        let x = pick_coordinate(&mut self.rng, self.canvas.width, self.margin_x);
        let y = pick_coordinate(&mut self.rng, self.canvas.height, self.margin_y);
        ShapeSpec {
            kind,
            position: Point::new(x, y),
            outline: kind.outline(),
            style: ShapeStyle::solid(color, self.waveforms.waveform_for(kind)),
        }
    }

    /// Generate a shape and add it straight to `registry`.
    pub fn spawn_into<B: VoiceBackend>(&mut self, registry: &mut ShapeRegistry<B>) -> Result<ShapeId, RegistryError> {
        let spec = self.generate();
        registry.add(spec.position, spec.outline, spec.style)
    }
}

/// Whole-unit coordinate uniform in `[margin, extent - margin]`; collapses to
/// the middle when the extent is too small for the margins.
fn pick_coordinate<R: Rng>(rng: &mut R, extent: f32, margin: u32) -> f32 {
    let lo = i64::from(margin);
    let hi = extent.floor() as i64 - lo;
    if lo > hi {
        return (extent / 2.0).floor();
    }
    rng.gen_range(lo..=hi) as f32
}
