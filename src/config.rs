//! Application configuration: canvas edges, control ranges, and asset paths.
//!
//! Read once at startup from `config.json` in the OS config directory
//! (`~/.config/FrameStudio/` on Linux, `~/Library/Application Support` on
//! macOS, `%APPDATA%` on Windows). Every field has a default, so the file is
//! optional and may be partial. Nothing is written back: the app does not
//! persist user settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::transform::TransformLimits;

pub const APP_DIR_NAME: &str = "FrameStudio";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Edge length of the square preview canvas, in pixels.
    pub preview_size: u32,
    /// Edge length of the square export canvas, in pixels.
    pub export_size: u32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub scale_step: f32,
    /// Offsets run from `-offset_range` to `+offset_range`, in preview pixels.
    pub offset_range: i32,
    /// Decorative frame asset. Relative paths resolve against the working
    /// directory.
    pub frame_path: PathBuf,
    /// When set, exports land here under the fixed file name without a save
    /// dialog.
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preview_size: 400,
            export_size: 800,
            scale_min: 0.5,
            scale_max: 3.0,
            scale_step: 0.1,
            offset_range: 100,
            frame_path: PathBuf::from("assets/frame.png"),
            export_dir: None,
        }
    }
}

impl AppConfig {
    /// Load the config file if present, falling back to defaults on absence
    /// or parse failure. Always returns a sanitized value.
    pub fn load() -> Self {
        let path = Self::config_path();
        let config = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                Ok(config) => {
                    log::info!("loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("ignoring malformed config {}: {}", path.display(), e);
                    AppConfig::default()
                }
            },
            Err(_) => AppConfig::default(),
        };
        config.sanitized()
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Clamp degenerate values so the rest of the app can trust the config.
    pub fn sanitized(mut self) -> Self {
        self.preview_size = self.preview_size.max(1);
        self.export_size = self.export_size.max(self.preview_size);
        if !(self.scale_min > 0.0) {
            self.scale_min = 0.5;
        }
        if self.scale_max < self.scale_min {
            self.scale_max = self.scale_min;
        }
        if !(self.scale_step > 0.0) {
            self.scale_step = 0.1;
        }
        self.offset_range = self.offset_range.max(0);
        self
    }

    pub fn transform_limits(&self) -> TransformLimits {
        TransformLimits {
            scale_min: self.scale_min,
            scale_max: self.scale_max,
            scale_step: self.scale_step,
            offset_range: self.offset_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_canvas_sizes() {
        let c = AppConfig::default();
        assert_eq!(c.preview_size, 400);
        assert_eq!(c.export_size, 800);
        assert_eq!(c.export_size, 2 * c.preview_size);
        assert_eq!(c.offset_range, 100);
        assert!((c.scale_min - 0.5).abs() < f32::EPSILON);
        assert!((c.scale_max - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let c: AppConfig = serde_json::from_str(r#"{"preview_size": 320}"#).unwrap();
        assert_eq!(c.preview_size, 320);
        assert_eq!(c.export_size, 800);
        assert_eq!(c.frame_path, PathBuf::from("assets/frame.png"));
    }

    #[test]
    fn test_sanitize_repairs_degenerate_values() {
        let c = AppConfig {
            preview_size: 0,
            export_size: 0,
            scale_min: -1.0,
            scale_max: -2.0,
            scale_step: 0.0,
            offset_range: -5,
            ..AppConfig::default()
        }
        .sanitized();
        assert!(c.preview_size >= 1);
        assert!(c.export_size >= c.preview_size);
        assert!(c.scale_min > 0.0);
        assert!(c.scale_max >= c.scale_min);
        assert!(c.scale_step > 0.0);
        assert_eq!(c.offset_range, 0);
    }

    #[test]
    fn test_limits_come_from_config() {
        let c = AppConfig::default();
        let limits = c.transform_limits();
        assert_eq!(limits.offset_range, 100);
        assert!((limits.scale_step - 0.1).abs() < f32::EPSILON);
    }
}
