//! Configuration loader for soundshapes.
//!
//! * Looks for `soundshapes.toml` in the cwd unless overridden by `--config`.
//! * Every field has a default, so the file is optional.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::audio::Canvas;
use crate::error::ConfigError;
use crate::generator::{WaveformOverrides, DEFAULT_MARGIN_X, DEFAULT_MARGIN_Y, DEFAULT_PALETTE};
use crate::registry::RegistryOptions;
use crate::shape::Color;

pub const DEFAULT_PATH: &str = "soundshapes.toml";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 600.0, height: 600.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub canvas: CanvasConfig,
    /// Live shape cap; the oldest shape is evicted beyond it.
    pub max_shapes: usize,
    /// Fade-out of evicted/removed voices, seconds.
    pub release_secs: f32,
    /// Glide time when a voice is retuned, seconds.
    pub glide_secs: f32,
    /// Output volume (0.0 to 2.0).
    pub master_volume: f32,
    pub palette: Vec<Color>,
    pub margin_x: u32,
    pub margin_y: u32,
    /// `[waveforms]` table: `triangle`/`diamond`/`square` = "sine" etc.
    pub waveforms: WaveformOverrides,
    /// Random seed for shape generation (optional).
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            max_shapes: 5,
            release_secs: 0.5,
            glide_secs: 0.1,
            master_volume: 1.0,
            palette: DEFAULT_PALETTE.to_vec(),
            margin_x: DEFAULT_MARGIN_X,
            margin_y: DEFAULT_MARGIN_Y,
            waveforms: WaveformOverrides::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Load from a TOML file; fall back to defaults on any error.
    pub fn load(path: Option<&str>) -> Self {
        let p = path.unwrap_or(DEFAULT_PATH);
        match Self::from_path(p) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if path.is_none() && e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("{p}: {e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if Canvas::new(self.canvas.width, self.canvas.height).is_err() {
            return invalid(format!("canvas {}x{} must be positive", self.canvas.width, self.canvas.height));
        }
        if self.max_shapes == 0 {
            return invalid("max_shapes must be at least 1".into());
        }
        for (name, secs) in [("release_secs", self.release_secs), ("glide_secs", self.glide_secs)] {
            if !secs.is_finite() || secs < 0.0 {
                return invalid(format!("{name} must be a non-negative number of seconds, got {secs}"));
            }
        }
        if !(0.0..=2.0).contains(&self.master_volume) {
            return invalid(format!("master_volume must be within 0.0..=2.0, got {}", self.master_volume));
        }
        if self.palette.is_empty() {
            return invalid("palette needs at least one color".into());
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas { width: self.canvas.width, height: self.canvas.height }
    }

    pub fn release_time(&self) -> Duration {
        Duration::from_secs_f32(self.release_secs.max(0.0))
    }

    pub fn glide_time(&self) -> Duration {
        Duration::from_secs_f32(self.glide_secs.max(0.0))
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            capacity: self.max_shapes,
            canvas: self.canvas(),
            release_time: self.release_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Waveform;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn parses_all_fields() {
        let text = r##"
            max_shapes = 8
            release_secs = 1.5
            glide_secs = 0.0
            master_volume = 0.5
            palette = ["#000000", "#ffffff"]
            margin_x = 10
            margin_y = 20
            seed = 1234

            [canvas]
            width = 800
            height = 400
        "##;
        let config = Config::from_toml_str(text).unwrap();
        assert_eq!(config.max_shapes, 8);
        assert_eq!(config.canvas(), Canvas { width: 800.0, height: 400.0 });
        assert_eq!(config.palette, vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]);
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.glide_time(), Duration::ZERO);

        let options = config.registry_options();
        assert_eq!(options.capacity, 8);
        assert_eq!(options.release_time, Duration::from_millis(1500));
    }

    #[test]
    fn parses_waveform_overrides() {
        let config = Config::from_toml_str("[waveforms]\nsquare = \"sine\"\ndiamond = \"triangle\"\n").unwrap();
        assert_eq!(
            config.waveforms,
            WaveformOverrides { triangle: None, diamond: Some(Waveform::Triangle), square: Some(Waveform::Sine) }
        );
        assert!(matches!(Config::from_toml_str("[waveforms]\nsquare = \"noise\"\n"), Err(ConfigError::Parse(_))));
        assert!(matches!(Config::from_toml_str("[waveforms]\ncircle = \"sine\"\n"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn partial_canvas_keeps_other_default() {
        let config = Config::from_toml_str("[canvas]\nwidth = 1024\n").unwrap();
        assert_eq!(config.canvas(), Canvas { width: 1024.0, height: 600.0 });
    }

    #[test]
    fn rejects_invalid_values() {
        for text in [
            "max_shapes = 0",
            "release_secs = -1.0",
            "master_volume = 3.0",
            "palette = []",
            "[canvas]\nheight = 0\n",
        ] {
            assert!(matches!(Config::from_toml_str(text), Err(ConfigError::Invalid(_))), "{text}");
        }
    }

    #[test]
    fn rejects_malformed_toml_and_colors() {
        assert!(matches!(Config::from_toml_str("max_shapes = "), Err(ConfigError::Parse(_))));
        assert!(matches!(Config::from_toml_str("palette = [\"red\"]"), Err(ConfigError::Parse(_))));
        assert!(matches!(Config::from_toml_str("bogus = 1"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let config = Config::load(Some("/nonexistent/soundshapes.toml"));
        assert_eq!(config, Config::default());
    }
}
