//! Application settings

use serde::{Deserialize, Serialize};
use shared::GridConfig;

/// Ground lattice settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    /// Show the lattice (ignored while arctic mode is active)
    pub visible: bool,
    /// Number of anchor points per side
    pub size: usize,
    /// Distance between adjacent anchor points
    pub spacing: f32,
    /// Wire line opacity (0.0 - 1.0)
    pub opacity: f32,
    /// Anchor marker size in pixels
    pub point_size: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            size: 10,
            spacing: 1.0,
            opacity: 0.8,
            point_size: 5.0,
        }
    }
}

impl GridSettings {
    pub fn config(&self) -> GridConfig {
        GridConfig {
            size: self.size,
            spacing: self.spacing,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Background color RGB in normal mode
    pub background_color: [u8; 3],
    /// Background tint RGB while arctic mode is active
    pub arctic_background: [u8; 3],
    /// Enable anti-aliasing
    pub antialiasing: bool,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [240, 240, 240],
            arctic_background: [206, 222, 233],
            antialiasing: true,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { font_size: 14.0 }
    }
}

/// All application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppSettings {
    /// Grid settings
    pub grid: GridSettings,
    /// Viewport settings
    pub viewport: ViewportSettings,
    /// UI settings
    pub ui: UiSettings,
}

impl AppSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "isovox", "isovox") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    return settings;
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "isovox", "isovox") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }
}
