//! Shape records: identity, style and the preset outlines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::audio::{VoiceParams, Waveform};
use crate::geometry::{Bounds, Outline, Point};

/// Handle to a registered shape. Never reused within one registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) u64);

impl ShapeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque display color, written as `#RRGGBB`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}, expected #RRGGBB")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(bad)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(bad());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How a shape is drawn and which waveform its voice plays.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShapeStyle {
    pub fill: Color,
    pub stroke: Color,
    pub waveform: Waveform,
}

impl ShapeStyle {
    /// Same color for fill and stroke.
    pub fn solid(color: Color, waveform: Waveform) -> Self {
        Self { fill: color, stroke: color, waveform }
    }
}

/// A live shape and the voice it owns.
#[derive(Debug)]
pub struct Shape<V> {
    pub(crate) id: ShapeId,
    pub(crate) position: Point,
    pub(crate) outline: Outline,
    pub(crate) style: ShapeStyle,
    pub(crate) params: VoiceParams,
    pub(crate) voice: V,
}

impl<V> Shape<V> {
    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    /// Parameters the voice was last tuned to.
    pub fn params(&self) -> VoiceParams {
        self.params
    }

    pub fn voice(&self) -> &V {
        &self.voice
    }

    /// Absolute vertices, ready for drawing.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.outline.placed_at(self.position)
    }

    pub fn bounds(&self) -> Bounds {
        self.outline.bounds().translated(self.position)
    }

    /// Even-odd containment of an absolute canvas point.
    pub fn contains(&self, point: Point) -> bool {
        self.outline.contains(point - self.position)
    }
}

/// The three stock shapes of the sketch, each with its own timbre.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Triangle,
    Diamond,
    Square,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Triangle, ShapeKind::Diamond, ShapeKind::Square];

    pub fn vertices(self) -> &'static [(f32, f32)] {
        match self {
            ShapeKind::Triangle => &[(0.0, 0.0), (30.0, 60.0), (-30.0, 60.0)],
            ShapeKind::Diamond => &[(0.0, 0.0), (30.0, 45.0), (0.0, 90.0), (-30.0, 45.0)],
            ShapeKind::Square => &[(0.0, 0.0), (60.0, 0.0), (60.0, 60.0), (0.0, 60.0)],
        }
    }

    pub fn outline(self) -> Outline {
        Outline::from_preset(self.vertices())
    }

    pub fn waveform(self) -> Waveform {
        match self {
            ShapeKind::Triangle => Waveform::Triangle,
            ShapeKind::Diamond => Waveform::Sawtooth,
            ShapeKind::Square => Waveform::Square,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Triangle => "triangle",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Square => "square",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_round_trips_through_hex() {
        let c: Color = "#F62A6B".parse().unwrap();
        assert_eq!(c, Color::rgb(0xF6, 0x2A, 0x6B));
        assert_eq!(c.to_string(), "#F62A6B");
        assert_eq!("#82f1d6".parse::<Color>().unwrap(), Color::rgb(0x82, 0xF1, 0xD6));
    }

    #[test]
    fn color_rejects_malformed_input() {
        for s in ["F62A6B", "#F62A6", "#GGGGGG", "#F62A6B0", "", "#ÿÿÿ"] {
            assert!(s.parse::<Color>().is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn presets_have_distinct_timbres() {
        assert_eq!(ShapeKind::Triangle.waveform(), Waveform::Triangle);
        assert_eq!(ShapeKind::Diamond.waveform(), Waveform::Sawtooth);
        assert_eq!(ShapeKind::Square.waveform(), Waveform::Square);
        for kind in ShapeKind::ALL {
            assert!(kind.outline().points().len() >= 3, "{}", kind.name());
        }
    }

    #[test]
    fn shape_id_display() {
        assert_eq!(ShapeId(7).to_string(), "#7");
    }
}
