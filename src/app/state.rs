// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::countdown::{Countdown, CountdownHandle};
use crate::backends::camera::{
    CameraDevice, CameraFacing, CameraSettings, FlashMode, MediaReference,
};
use crate::config::Config;
use crate::constants::TimerSetting;
use crate::errors::{AppError, StorageError};
use crate::storage::MediaStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Instant;

/// Whether a platform permission has been granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessState {
    /// Request not answered yet
    #[default]
    Pending,
    Granted,
    Denied,
}

impl AccessState {
    pub fn from_granted(granted: bool) -> Self {
        if granted {
            AccessState::Granted
        } else {
            AccessState::Denied
        }
    }
}

/// Photo capture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// No capture in flight
    #[default]
    Idle,
    /// Waiting for the device to return the photo
    InFlight {
        /// Capture was fired by the self-timer
        timed: bool,
    },
}

/// Recording state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// Not recording
    #[default]
    Idle,
    /// Start requested, waiting for the device
    Starting,
    /// Actively recording
    Recording {
        /// When recording started
        start_time: Instant,
    },
    /// Stop requested, waiting for the finished file
    Stopping {
        /// When recording started
        start_time: Instant,
    },
}

impl RecordingState {
    /// Check if currently recording (including while the file is finalized)
    pub fn is_recording(&self) -> bool {
        matches!(
            self,
            RecordingState::Recording { .. } | RecordingState::Stopping { .. }
        )
    }

    /// Check if any recording activity is underway
    pub fn is_active(&self) -> bool {
        !matches!(self, RecordingState::Idle)
    }

    /// Get the elapsed recording duration in seconds
    pub fn elapsed_duration(&self) -> u64 {
        match self {
            RecordingState::Recording { start_time } | RecordingState::Stopping { start_time } => {
                start_time.elapsed().as_secs()
            }
            _ => 0,
        }
    }
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// Non-fatal, user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifies this notification for dismissal
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

/// What the screen shows
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureView {
    /// Camera access denied; no captures are attempted
    NoAccess,
    /// Live viewfinder
    Live,
    /// Live viewfinder with the self-timer counting down
    CountingDown { remaining: u32 },
    /// Live viewfinder while recording video
    Recording { elapsed_secs: u64 },
    /// Captured photo or video awaiting save or discard
    Previewing(MediaReference),
}

/// Session state for the capture screen
///
/// Created when the screen opens and reset when it closes. Only message
/// handlers mutate it.
#[derive(Debug)]
pub struct SessionState {
    pub camera_facing: CameraFacing,
    pub flash_mode: FlashMode,
    /// Normalized zoom level in [0.0, 1.0]
    pub zoom_level: f32,
    pub timer_setting: TimerSetting,
    pub timer_picker_visible: bool,
    pub countdown: Countdown,
    pub capture: CaptureState,
    /// Captured media being previewed; `None` while the viewfinder is live
    pub captured_media: Option<MediaReference>,
    pub recording: RecordingState,
    pub is_saving: bool,
    /// Library file written by the most recent successful save
    pub last_saved: Option<PathBuf>,
    pub camera_access: AccessState,
    pub media_access: AccessState,
    pub notification: Option<Notification>,
}

impl SessionState {
    /// Fresh session using the configured defaults
    pub fn from_config(config: &Config) -> Self {
        Self {
            camera_facing: config.default_facing,
            flash_mode: config.default_flash,
            zoom_level: 0.0,
            timer_setting: config.default_timer,
            timer_picker_visible: false,
            countdown: Countdown::new(),
            capture: CaptureState::Idle,
            captured_media: None,
            recording: RecordingState::Idle,
            is_saving: false,
            last_saved: None,
            camera_access: AccessState::Pending,
            media_access: AccessState::Pending,
            notification: None,
        }
    }

    /// Settings the camera device should be using
    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            facing: self.camera_facing,
            flash: self.flash_mode,
            zoom: self.zoom_level,
        }
    }

    /// Self-timer running, or its capture still in flight
    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_running() || self.capture == CaptureState::InFlight { timed: true }
    }

    pub fn is_capturing(&self) -> bool {
        self.capture != CaptureState::Idle
    }
}

/// Read-only copy of the session state for views
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub camera_facing: CameraFacing,
    pub flash_mode: FlashMode,
    pub zoom_level: f32,
    pub timer_setting: TimerSetting,
    pub timer_picker_visible: bool,
    pub is_counting_down: bool,
    pub remaining_seconds: u32,
    pub is_capturing: bool,
    pub captured_media: Option<MediaReference>,
    pub is_recording_video: bool,
    pub recording_elapsed_secs: u64,
    pub is_saving: bool,
    pub last_saved: Option<PathBuf>,
    pub camera_access: AccessState,
    pub media_access: AccessState,
    pub notification: Option<Notification>,
}

impl Snapshot {
    /// The screen to render
    pub fn view(&self) -> CaptureView {
        if self.camera_access == AccessState::Denied {
            CaptureView::NoAccess
        } else if let Some(media) = &self.captured_media {
            CaptureView::Previewing(media.clone())
        } else if self.is_recording_video {
            CaptureView::Recording {
                elapsed_secs: self.recording_elapsed_secs,
            }
        } else if self.is_counting_down {
            CaptureView::CountingDown {
                remaining: self.remaining_seconds,
            }
        } else {
            CaptureView::Live
        }
    }
}

impl From<&SessionState> for Snapshot {
    fn from(session: &SessionState) -> Self {
        Self {
            camera_facing: session.camera_facing,
            flash_mode: session.flash_mode,
            zoom_level: session.zoom_level,
            timer_setting: session.timer_setting,
            timer_picker_visible: session.timer_picker_visible,
            is_counting_down: session.is_counting_down(),
            remaining_seconds: session.countdown.remaining(),
            is_capturing: session.is_capturing(),
            captured_media: session.captured_media.clone(),
            is_recording_video: session.recording.is_recording(),
            recording_elapsed_secs: session.recording.elapsed_duration(),
            is_saving: session.is_saving,
            last_saved: session.last_saved.clone(),
            camera_access: session.camera_access,
            media_access: session.media_access,
            notification: session.notification.clone(),
        }
    }
}

/// The capture controller
///
/// Owns the session state and the camera and media store collaborators.
/// All changes go through [`AppModel::update`].
pub struct AppModel {
    pub(crate) config: Config,
    pub(crate) camera: Arc<dyn CameraDevice>,
    pub(crate) store: Arc<dyn MediaStore>,
    pub(crate) session: SessionState,
    pub(crate) next_notification_id: u64,
}

/// Messages are used to pass events from the user and from finished tasks
/// into the application model.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Permissions =====
    /// Ask for camera and media library access
    RequestPermissions,
    /// Answers to the permission requests
    PermissionsResolved { camera: bool, media: bool },

    // ===== Camera Controls =====
    /// Switch between front and back camera
    ToggleFacing,
    /// Switch flash between off and on
    ToggleFlash,
    /// Set an absolute zoom level (preset buttons)
    SetZoom(f32),
    /// Pinch-gesture update (`scale` 1.0 = no change)
    PinchZoom { scale: f32 },
    ZoomIn,
    ZoomOut,
    ResetZoom,

    // ===== Timer =====
    ToggleTimerPicker,
    CloseTimerPicker,
    /// Pick a self-timer preset (closes the picker)
    SelectTimer(TimerSetting),
    /// Step through the self-timer presets
    CycleTimer,

    // ===== Photo Capture =====
    /// Shutter button pressed
    RequestCapture,
    /// One second of the self-timer elapsed
    CountdownTick(CountdownHandle),
    /// Abort the self-timer without capturing
    CancelCountdown,
    /// Device returned the photo (or failed)
    PhotoCaptured(Result<MediaReference, AppError>),

    // ===== Video =====
    RequestVideoStart,
    RecordingStarted(Result<(), AppError>),
    RequestVideoStop,
    RecordingStopped(Result<MediaReference, AppError>),
    /// Refresh the recording duration display
    UpdateRecordingDuration,

    // ===== Preview =====
    /// Drop the captured media and return to the viewfinder
    DiscardPreview,
    /// Add the captured media to the media library
    SavePreview,
    PreviewSaved {
        media: MediaReference,
        result: Result<PathBuf, StorageError>,
    },

    // ===== Notifications =====
    DismissNotification(u64),

    // ===== Lifecycle =====
    /// Screen closed
    Shutdown,
}
