use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Terrain parameters loadable from TOML. Every field has a compiled-in
/// default so a partial (or absent) file is fine.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default)]
    pub flat: Flat,
    #[serde(default)]
    pub height: Height,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            flat: Flat::default(),
            height: Height::default(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Normal,
    Flat,
}

fn default_mode() -> Mode {
    Mode::Normal
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Flat {
    #[serde(default)]
    pub height: i32,
}

impl Default for Flat {
    fn default() -> Self {
        Self { height: 0 }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    /// Per-octave noise frequencies, broadest first.
    #[serde(default = "default_octave_frequencies")]
    pub octave_frequencies: Vec<f32>,
    /// Per-octave weights; the summed noise is normalized by their total.
    #[serde(default = "default_octave_amplitudes")]
    pub octave_amplitudes: Vec<f32>,
    #[serde(default = "default_min_y")]
    pub min_y: i32,
    #[serde(default = "default_max_y")]
    pub max_y: i32,
}

fn default_octave_frequencies() -> Vec<f32> {
    vec![0.0035, 0.011, 0.043, 0.17]
}

fn default_octave_amplitudes() -> Vec<f32> {
    vec![0.55, 0.27, 0.12, 0.06]
}

fn default_min_y() -> i32 {
    -64
}

fn default_max_y() -> i32 {
    128
}

impl Default for Height {
    fn default() -> Self {
        Self {
            octave_frequencies: default_octave_frequencies(),
            octave_amplitudes: default_octave_amplitudes(),
            min_y: default_min_y(),
            max_y: default_max_y(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = WorldGenConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.mode, Mode::Normal);
        assert_eq!(cfg.flat.height, 0);
        assert_eq!(cfg.height.octave_frequencies.len(), 4);
        assert_eq!(cfg.height.octave_amplitudes.len(), 4);
    }

    #[test]
    fn partial_config_overrides_what_it_names() {
        let cfg = WorldGenConfig::from_toml_str(
            r#"
            mode = "flat"

            [flat]
            height = 12

            [height]
            min_y = -10
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mode, Mode::Flat);
        assert_eq!(cfg.flat.height, 12);
        assert_eq!(cfg.height.min_y, -10);
        assert_eq!(cfg.height.max_y, default_max_y());
    }
}
