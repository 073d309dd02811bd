// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Permissions, saving or discarding the preview, and shutdown.

use crate::app::state::{
    AccessState, AppModel, Message, NotificationKind, RecordingState, SessionState,
};
use crate::app::task::Task;
use crate::backends::camera::{MediaKind, MediaReference};
use crate::errors::{AppError, StorageError};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

impl AppModel {
    // =========================================================================
    // Permission Handlers
    // =========================================================================

    /// Ask the camera and the media store for access
    pub(crate) fn handle_request_permissions(&mut self) -> Task<Message> {
        let camera = self.camera.request_permission();
        let media = self.store.request_permission();
        Task::perform(futures::future::join(media, camera), |(media, camera)| {
            Message::PermissionsResolved { camera, media }
        })
    }

    pub(crate) fn handle_permissions_resolved(
        &mut self,
        camera: bool,
        media: bool,
    ) -> Task<Message> {
        self.session.camera_access = AccessState::from_granted(camera);
        self.session.media_access = AccessState::from_granted(media);
        info!(camera, media, "Permissions resolved");

        if !camera {
            warn!("No access to camera");
            if self.session.countdown.cancel() {
                info!("Photo timer countdown cancelled, camera access lost");
            }
        }
        if !media {
            warn!("No access to media library, saving disabled");
        }
        Task::none()
    }

    // =========================================================================
    // Preview Handlers
    // =========================================================================

    pub(crate) fn handle_discard_preview(&mut self) -> Task<Message> {
        match self.session.captured_media.take() {
            Some(media) => info!(path = %media, "Preview discarded"),
            None => warn!("Discard requested with no preview"),
        }
        Task::none()
    }

    pub(crate) fn handle_save_preview(&mut self) -> Task<Message> {
        let Some(media) = self.session.captured_media.clone() else {
            warn!("Save requested with no preview");
            return Task::none();
        };
        if self.session.is_saving {
            debug!("Save already in progress");
            return Task::none();
        }
        if !self.store.permission_granted() {
            warn!("Cannot save, no access to media library");
            return self.notify_error(&AppError::Storage(StorageError::PermissionDenied));
        }

        info!(path = %media, "Saving to media library");
        self.session.is_saving = true;
        Task::perform(self.store.persist_asset(&media), move |result| {
            Message::PreviewSaved { media, result }
        })
    }

    pub(crate) fn handle_preview_saved(
        &mut self,
        media: MediaReference,
        result: Result<PathBuf, StorageError>,
    ) -> Task<Message> {
        self.session.is_saving = false;

        match result {
            Ok(path) => {
                info!(path = %path.display(), "Saved to media library");
                self.session.last_saved = Some(path);
                if self.session.captured_media.as_ref() == Some(&media) {
                    self.session.captured_media = None;
                }
                let message = match media.kind() {
                    MediaKind::Photo => "Picture saved! 🎉",
                    MediaKind::Video => "Video saved! 🎉",
                };
                self.notify(NotificationKind::Info, message)
            }
            Err(err) => {
                error!(error = %err, path = %media, "Failed to save to media library");
                self.notify_error(&AppError::Storage(err))
            }
        }
    }

    // =========================================================================
    // Lifecycle Handlers
    // =========================================================================

    pub(crate) fn handle_shutdown(&mut self) -> Task<Message> {
        info!("Capture screen closing");
        // A pending stop is already on its way to the device
        let stop = match self.session.recording {
            RecordingState::Starting | RecordingState::Recording { .. } => {
                warn!(
                    state = ?self.session.recording,
                    "Shutting down while recording, stopping recorder"
                );
                self.stop_recording_task()
            }
            RecordingState::Idle | RecordingState::Stopping { .. } => Task::none(),
        };

        // Keep the countdown generation so ticks already scheduled stay stale
        let mut countdown = std::mem::take(&mut self.session.countdown);
        countdown.cancel();
        let fresh = SessionState::from_config(&self.config);
        let previous = std::mem::replace(&mut self.session, fresh);
        self.session.countdown = countdown;
        self.session.camera_access = previous.camera_access;
        self.session.media_access = previous.media_access;
        stop
    }
}
