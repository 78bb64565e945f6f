use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::CircleMode;
use crate::error::ConfigError;

/// Environment variable naming a JSON file to load the configuration from
pub const CONFIG_ENV_VAR: &str = "WHITEBOARD_CONFIG";

/// Presentation constants for the whiteboard.
///
/// Every field has a default, so a config file only needs to list the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    /// Paint color of an empty canvas, also used by the eraser
    pub background: Color32,
    pub grid_spacing: f32,
    pub grid_color: Color32,
    pub grid_width: f32,
    /// Eraser width as a multiple of the brush width
    pub eraser_factor: f32,
    /// Text font size as a multiple of the brush width
    pub text_scale: f32,
    pub circle_mode: CircleMode,
    /// Canvas size used before the first layout pass
    pub canvas_size: [u32; 2],
    pub jpeg_quality: u8,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            grid_spacing: 20.0,
            grid_color: Color32::from_rgb(211, 211, 211),
            grid_width: 0.5,
            eraser_factor: 2.0,
            text_scale: 3.0,
            circle_mode: CircleMode::default(),
            canvas_size: [1200, 800],
            jpeg_quality: 90,
        }
    }
}

impl WhiteboardConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load the config named by `WHITEBOARD_CONFIG`, if the variable is set
    pub fn from_env() -> Option<Result<Self, ConfigError>> {
        let path = std::env::var_os(CONFIG_ENV_VAR)?;
        log::info!("Loading config from {}", Path::new(&path).display());
        Some(Self::load(Path::new(&path)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_spacing.is_finite() && self.grid_spacing >= 2.0) {
            return Err(ConfigError::Invalid(format!(
                "grid_spacing must be at least 2, got {}",
                self.grid_spacing
            )));
        }
        if !(self.grid_width.is_finite() && self.grid_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "grid_width must be positive, got {}",
                self.grid_width
            )));
        }
        if !(self.eraser_factor.is_finite() && self.eraser_factor >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "eraser_factor must be at least 1, got {}",
                self.eraser_factor
            )));
        }
        if !(self.text_scale.is_finite() && self.text_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "text_scale must be positive, got {}",
                self.text_scale
            )));
        }
        let [width, height] = self.canvas_size;
        if width == 0 || height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas_size must be non-zero, got {width}x{height}"
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
