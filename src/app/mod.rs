// SPDX-License-Identifier: MPL-2.0

//! Capture screen application module
//!
//! This module contains the capture controller: session state, message
//! handling and the runtime loop that drives it.
//!
//! # Architecture
//!
//! - `state`: Session state types (AppModel, Message, Snapshot, etc.)
//! - `countdown`: Self-timer countdown with superseding handles
//! - `task`: Deferred work returned by handlers
//! - `update`: Message dispatch
//! - `handlers`: Message handlers grouped by domain
//! - `runtime`: Message loop and snapshot publishing
//!
//! # Main Types
//!
//! - `AppModel`: The capture controller
//! - `Message`: All possible user interactions and system events
//! - `Snapshot`: Read-only state for views

pub mod countdown;
mod handlers;
pub mod runtime;
mod state;
pub mod task;
mod update;

use crate::backends::camera::CameraDevice;
use crate::config::Config;
use crate::storage::MediaStore;
pub use countdown::{Countdown, CountdownHandle, Tick};
pub use runtime::{Runtime, RuntimeHandle};
pub use state::{
    AccessState, AppModel, CaptureState, CaptureView, Message, Notification, NotificationKind,
    RecordingState, SessionState, Snapshot,
};
use std::sync::Arc;
pub use task::Task;
use tracing::info;

impl AppModel {
    /// Create the controller for a freshly opened capture screen
    ///
    /// Pushes the initial camera settings to the device. Permissions are not
    /// requested until [`Message::RequestPermissions`] is handled.
    pub fn new(config: Config, camera: Arc<dyn CameraDevice>, store: Arc<dyn MediaStore>) -> Self {
        let session = SessionState::from_config(&config);
        let model = Self {
            config,
            camera,
            store,
            session,
            next_notification_id: 0,
        };
        info!(
            facing = %model.session.camera_facing,
            timer = %model.session.timer_setting,
            "Capture session created"
        );
        model.apply_camera_settings();
        model
    }

    /// Read-only copy of the session state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.session)
    }
}
