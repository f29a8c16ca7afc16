//! soundshapes — shapes on a canvas that sound.
//!
//! Every shape owns one voice whose pitch follows its height on the canvas
//! and whose loudness follows its horizontal position. The registry keeps a
//! bounded number of shapes alive, evicting the oldest (and fading out its
//! voice) when a new one arrives. Drawing and input belong to the host; this
//! crate holds the state and drives the audio.
//!
//! # Features
//! * **playback** — real audio output through `rodio`. Without it only the
//!   headless [`SilentBackend`] is available.
//!
//! # Example
//! ```
//! use soundshapes::{Point, RegistryOptions, ShapeKind, ShapeRegistry, ShapeStyle, SilentBackend};
//! use soundshapes::shape::Color;
//!
//! let options = RegistryOptions { capacity: 3, ..Default::default() };
//! let mut shapes = ShapeRegistry::new(SilentBackend::new(), options).unwrap();
//! let style = ShapeStyle::solid(Color::rgb(0xF6, 0x2A, 0x6B), ShapeKind::Square.waveform());
//!
//! let id = shapes.add(Point::new(270.0, 270.0), ShapeKind::Square.outline(), style).unwrap();
//! assert_eq!(shapes.hit_test(Point::new(300.0, 300.0)), Some(id));
//!
//! shapes.move_shape(id, Point::new(0.0, 0.0)).unwrap();
//! assert_eq!(shapes.get(id).unwrap().params().frequency, 523.0);
//! ```

pub mod audio;
pub mod config;
pub mod drag;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod registry;
pub mod shape;

// Main exports
pub use audio::{Canvas, Release, SilentBackend, SoundMapper, VoiceBackend, VoiceParams, Waveform};
pub use config::Config;
pub use drag::DragGesture;
pub use error::{AudioError, ConfigError, RegistryError};
pub use generator::{ShapeGenerator, ShapeSpec, WaveformOverrides};
pub use geometry::{Outline, Point};
pub use registry::{RegistryOptions, ShapeRegistry};
pub use shape::{Shape, ShapeId, ShapeKind, ShapeStyle};
