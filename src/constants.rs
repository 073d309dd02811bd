// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Self-timer presets offered by the timer picker
///
/// The picker only ever produces one of these values, so an out-of-set
/// duration cannot reach the capture controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimerSetting {
    /// Capture immediately
    #[default]
    Off,
    /// 3 second countdown
    Three,
    /// 5 second countdown
    Five,
    /// 10 second countdown
    Ten,
}

impl TimerSetting {
    /// All presets in picker order
    pub const ALL: [TimerSetting; 4] = [
        TimerSetting::Off,
        TimerSetting::Three,
        TimerSetting::Five,
        TimerSetting::Ten,
    ];

    /// Countdown length in seconds (0 = capture immediately)
    pub fn seconds(&self) -> u32 {
        match self {
            TimerSetting::Off => 0,
            TimerSetting::Three => 3,
            TimerSetting::Five => 5,
            TimerSetting::Ten => 10,
        }
    }

    /// Look up the preset for a number of seconds
    pub fn from_seconds(seconds: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.seconds() == seconds)
    }

    /// Cycle to the next preset: Off -> 3s -> 5s -> 10s -> Off
    pub fn next(self) -> Self {
        match self {
            TimerSetting::Off => TimerSetting::Three,
            TimerSetting::Three => TimerSetting::Five,
            TimerSetting::Five => TimerSetting::Ten,
            TimerSetting::Ten => TimerSetting::Off,
        }
    }

    /// Label shown next to the timer button (e.g. "5s")
    pub fn label(&self) -> String {
        format!("{}s", self.seconds())
    }
}

impl std::fmt::Display for TimerSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Zoom constants
///
/// Zoom is normalized: 0.0 is the widest field of view, 1.0 the tightest.
pub mod zoom {
    /// Lower bound of the zoom level
    pub const MIN: f32 = 0.0;

    /// Upper bound of the zoom level
    pub const MAX: f32 = 1.0;

    /// Adjustment applied per pinch-gesture update event
    pub const PINCH_STEP: f32 = 0.005;

    /// Rounding slack at the bounds for pinch steps, so accumulated float
    /// error does not stop a pinch just short of MIN or MAX
    pub const BOUND_SLACK: f32 = 1e-4;

    /// Adjustment applied by the zoom in/out buttons
    pub const BUTTON_STEP: f32 = 0.1;

    /// Absolute levels offered as preset buttons
    pub const PRESETS: [f32; 3] = [0.0, 0.5, 1.0];

    /// Magnification reached at zoom level 1.0 by the synthetic camera
    pub const MAX_MAGNIFICATION: f32 = 4.0;

    /// Clamp a zoom level into the valid range (NaN maps to MIN)
    pub fn clamp(level: f32) -> f32 {
        if level.is_nan() {
            MIN
        } else {
            level.clamp(MIN, MAX)
        }
    }
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Interval between countdown ticks
    pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

    /// How long a notification stays visible before auto-dismiss
    pub const NOTIFICATION_SECS: u64 = 3;

    /// Longest notification duration accepted from the config file
    pub const MAX_NOTIFICATION_SECS: u64 = 60;

    /// Interval between recording duration refreshes
    pub const RECORDING_DURATION_REFRESH: Duration = Duration::from_secs(1);

    /// Terminal UI input poll interval
    pub const TERMINAL_POLL: Duration = Duration::from_millis(50);

    /// Frame rate of synthetic camera recordings
    pub const RECORDING_FPS: u32 = 5;

    /// Upper bound on frames written to one synthetic recording
    pub const MAX_RECORDING_FRAMES: u32 = 300;
}

/// Synthetic camera output
pub mod synthetic {
    /// Frame width in pixels
    pub const FRAME_WIDTH: u32 = 640;

    /// Frame height in pixels
    pub const FRAME_HEIGHT: u32 = 480;

    /// Recording frame width in pixels
    pub const RECORDING_WIDTH: u32 = 320;

    /// Recording frame height in pixels
    pub const RECORDING_HEIGHT: u32 = 240;

    /// JPEG quality for captured photos
    pub const JPEG_QUALITY: u8 = 90;

    /// Brightness added to every channel while the flash fires
    pub const FLASH_BOOST: u8 = 60;
}

/// Application information utilities
pub mod app_info {
    /// Directory name used under Pictures, Videos, config and cache
    pub const APP_DIR_NAME: &str = "shutter";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
