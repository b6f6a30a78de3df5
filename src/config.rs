//! Configuration for the renderer, the source overlay and the trace player
//!
//! Every field has a default, so an empty or partial TOML file is valid:
//!
//! ```toml
//! [renderer]
//! null_text = "null"
//!
//! [overlay]
//! breakpoint_glyph = "●"
//! current_line_glyph = "▶"
//!
//! [player]
//! play_interval_ms = 1000
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub renderer: RendererConfig,
    pub overlay: OverlayConfig,
    pub player: PlayerConfig,
}

/// Diagram renderer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Text shown in the value cell of a null reference
    pub null_text: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            null_text: crate::snapshot::NULL_SENTINEL.to_string(),
        }
    }
}

/// Source marker overlay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Gutter glyph placed by breakpoint toggles
    pub breakpoint_glyph: String,
    /// Gutter glyph of the line about to execute
    pub current_line_glyph: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            breakpoint_glyph: "●".to_string(),
            current_line_glyph: "▶".to_string(),
        }
    }
}

/// Trace replay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Delay between steps while auto-playing
    pub play_interval_ms: u64,
    /// Estimated memory budget for loaded trace history
    pub history_limit_bytes: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            play_interval_ms: 1000,
            history_limit_bytes: 1024 * 1024 * 1024,
        }
    }
}

impl PlayerConfig {
    pub fn play_interval(&self) -> Duration {
        Duration::from_millis(self.play_interval_ms)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [renderer]
            null_text = "nil"

            [player]
            play_interval_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.renderer.null_text, "nil");
        assert_eq!(config.player.play_interval(), Duration::from_millis(250));
        assert_eq!(config.player.history_limit_bytes, PlayerConfig::default().history_limit_bytes);
        assert_eq!(config.overlay, OverlayConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(Config::from_toml("[renderer"), Err(Error::Config(_))));
    }
}
