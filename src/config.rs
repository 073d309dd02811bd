// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::{CameraFacing, FlashMode};
use crate::constants::{TimerSetting, app_info, timing, zoom};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Current on-disk config version
pub const CONFIG_VERSION: u32 = 1;

/// User configuration
///
/// Stored as JSON at `$XDG_CONFIG_HOME/shutter/config.json`. Unknown or
/// missing fields fall back to their defaults so older files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Config file version
    pub version: u32,
    /// Camera selected when the screen opens
    pub default_facing: CameraFacing,
    /// Flash mode selected when the screen opens
    pub default_flash: FlashMode,
    /// Self-timer selected when the screen opens
    pub default_timer: TimerSetting,
    /// Mirror front camera captures horizontally (selfie mode)
    pub mirror_front_camera: bool,
    /// Zoom change per pinch-gesture update
    pub pinch_step: f32,
    /// Seconds a notification stays visible
    pub notification_secs: u64,
    /// Override for the photo library directory
    pub photo_dir: Option<PathBuf>,
    /// Override for the video library directory
    pub video_dir: Option<PathBuf>,
    /// Override for the directory holding unsaved captures
    pub capture_cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            default_facing: CameraFacing::default(), // Back camera
            default_flash: FlashMode::default(),     // Off
            default_timer: TimerSetting::default(),  // Capture immediately
            mirror_front_camera: true,
            pinch_step: zoom::PINCH_STEP,
            notification_secs: timing::NOTIFICATION_SECS,
            photo_dir: None,
            video_dir: None,
            capture_cache_dir: None,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app_info::APP_DIR_NAME).join("config.json"))
    }

    /// Load config from `path`, falling back to defaults when the file is absent
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::Config(format!("{}: {}", path.display(), e))),
        };

        let mut config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        if config.version > CONFIG_VERSION {
            warn!(
                found = config.version,
                supported = CONFIG_VERSION,
                "Config written by a newer version"
            );
        }
        config.sanitize();
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load config from the default location
    pub fn load() -> AppResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write config as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Replace out-of-range values with defaults
    fn sanitize(&mut self) {
        if !self.pinch_step.is_finite() || self.pinch_step <= 0.0 || self.pinch_step > zoom::MAX {
            warn!(pinch_step = self.pinch_step, "Invalid pinch step, using default");
            self.pinch_step = zoom::PINCH_STEP;
        }
        if self.notification_secs == 0 {
            self.notification_secs = timing::NOTIFICATION_SECS;
        } else if self.notification_secs > timing::MAX_NOTIFICATION_SECS {
            warn!(
                notification_secs = self.notification_secs,
                "Notification duration too long, capping"
            );
            self.notification_secs = timing::MAX_NOTIFICATION_SECS;
        }
    }

    /// Directory for unsaved captures (photos awaiting save, finished recordings)
    pub fn capture_cache_dir(&self) -> PathBuf {
        self.capture_cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(app_info::APP_DIR_NAME)
                .join("captures")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "default_timer": "Five" }"#).unwrap();
        assert_eq!(config.default_timer, TimerSetting::Five);
        assert_eq!(config.default_facing, CameraFacing::Back);
        assert!(config.mirror_front_camera);
    }

    #[test]
    fn test_sanitize_pinch_step() {
        let mut config = Config {
            pinch_step: -1.0,
            notification_secs: 0,
            ..Config::default()
        };
        config.sanitize();
        assert_eq!(config.pinch_step, zoom::PINCH_STEP);
        assert_eq!(config.notification_secs, timing::NOTIFICATION_SECS);
    }

    #[test]
    fn test_sanitize_caps_notification_secs() {
        let mut config = Config {
            notification_secs: u64::MAX,
            ..Config::default()
        };
        config.sanitize();
        assert_eq!(config.notification_secs, timing::MAX_NOTIFICATION_SECS);
    }
}
