// Shell configuration
//
// Display, overlay, asset and snapshot settings, persisted as TOML.

use crate::config::{self, ConfigError};
use crate::raster::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file path
pub const CONFIG_FILE: &str = "shell_config.toml";

/// Shell configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Display settings
    pub display: DisplayConfig,

    /// Overlay timing and colors
    pub overlays: OverlayConfig,

    /// Skin images and area tables
    pub assets: AssetConfig,

    /// Snapshot settings
    pub snapshots: SnapshotConfig,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Device pixels per logical pixel, applied to touch points
    pub pixel_density: f32,

    /// Dropped frames per drain above which a warning is logged
    pub frame_queue_warn_depth: usize,
}

/// Overlay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Lifetime of the button-press highlight (0 = until released)
    pub press_highlight_ms: u32,

    /// RGBA tint of the button-press highlight
    pub press_highlight_color: [u8; 4],

    /// Lifetime of message banners on the emulator screen
    pub banner_ms: u32,

    /// RGBA tint of the area debug view
    pub area_debug_color: [u8; 4],
}

/// Asset configuration
///
/// Missing skins fall back to plain placeholder images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Console skin PNG
    pub console_image: Option<PathBuf>,

    /// Controller skin PNG
    pub controller_image: Option<PathBuf>,

    /// Controller area table JSON; the built-in table is used when absent
    pub controller_areas: Option<PathBuf>,
}

/// Snapshot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Snapshot directory
    pub directory: PathBuf,

    /// Include timestamp in filename
    pub include_timestamp: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            pixel_density: 1.0,
            frame_queue_warn_depth: 4,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            press_highlight_ms: 150,
            press_highlight_color: [255, 255, 255, 96],
            banner_ms: 2000,
            area_debug_color: [255, 0, 0, 128],
        }
    }
}

impl OverlayConfig {
    pub fn press_highlight_color(&self) -> Color {
        Color::from_array(self.press_highlight_color)
    }

    pub fn area_debug_color(&self) -> Color {
        Color::from_array(self.area_debug_color)
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            directory: PathBuf::from("snapshots"),
            include_timestamp: true,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            display: DisplayConfig::default(),
            overlays: OverlayConfig::default(),
            assets: AssetConfig::default(),
            snapshots: SnapshotConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        config::load_toml(path)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        config::save_toml(self, path)
    }

    /// Load configuration from file or create default
    ///
    /// If the file cannot be loaded, the default configuration is written to it.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        config::load_toml_or_default(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.display.pixel_density, 1.0);
        assert_eq!(config.overlays.press_highlight_ms, 150);
        assert_eq!(config.overlays.banner_ms, 2000);
        assert_eq!(config.overlays.area_debug_color(), Color::rgba(255, 0, 0, 128));
        assert_eq!(config.snapshots.directory, PathBuf::from("snapshots"));
        assert!(config.assets.controller_image.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = ShellConfig::default();
        config.assets.controller_image = Some(PathBuf::from("skins/controller.png"));

        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: ShellConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ShellConfig = toml::from_str(
            r#"
            [display]
            pixel_density = 2.5
            "#,
        )
        .unwrap();
        assert_eq!(config.display.pixel_density, 2.5);
        assert_eq!(config.display.frame_queue_warn_depth, 4);
        assert_eq!(config.overlays, OverlayConfig::default());
    }
}
