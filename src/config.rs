//! Overlay configuration
//!
//! A small TOML file under the user config dir; every field has a default,
//! and a missing file just means defaults.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::overlay::{PANEL_HEIGHT, PANEL_WIDTH};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Panel width in pixels.
    pub panel_width: u32,
    /// Panel height in pixels.
    pub panel_height: u32,
    /// Font family for the status text; system sans-serif when unset.
    pub font_family: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            panel_width: PANEL_WIDTH,
            panel_height: PANEL_HEIGHT,
            font_family: None,
        }
    }
}

/// `$XDG_CONFIG_HOME/tempo/osd.toml` (or the platform equivalent).
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tempo").map(|dirs| dirs.config_dir().join("osd.toml"))
}

impl Config {
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_panel_geometry() {
        let config = Config::default();
        assert_eq!(config.panel_width, 380);
        assert_eq!(config.panel_height, 128);
        assert!(config.font_family.is_none());
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str("panel_width = 400").unwrap();
        assert_eq!(config.panel_width, 400);
        assert_eq!(config.panel_height, 128);
    }

    #[test]
    fn test_full_toml_roundtrip() {
        let config: Config = toml::from_str(
            "panel_width = 500\npanel_height = 200\nfont_family = \"Cantarell\"",
        )
        .unwrap();
        assert_eq!(config.panel_width, 500);
        assert_eq!(config.panel_height, 200);
        assert_eq!(config.font_family.as_deref(), Some("Cantarell"));
    }
}
