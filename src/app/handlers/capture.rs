// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles the shutter button, the self-timer countdown, photo capture results
//! and video recording.

use crate::app::countdown::{CountdownHandle, Tick};
use crate::app::state::{AppModel, CaptureState, Message, RecordingState};
use crate::app::task::Task;
use crate::backends::camera::{BackendError, MediaReference};
use crate::constants::timing;
use crate::errors::{AppError, CameraError};
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

impl AppModel {
    // =========================================================================
    // Capture Operations Handlers
    // =========================================================================

    /// Create a delayed task that sends a message after `delay`
    pub(crate) fn delay_task(delay: Duration, message: Message) -> Task<Message> {
        Task::perform(
            async move {
                tokio::time::sleep(delay).await;
                message
            },
            |message| message,
        )
    }

    /// Why a new capture or recording cannot start right now
    fn capture_blocker(&self) -> Option<&'static str> {
        if !self.camera.permission_granted() {
            Some("camera access not granted")
        } else if self.session.captured_media.is_some() {
            Some("preview is showing")
        } else if self.session.is_capturing() {
            Some("photo capture in flight")
        } else if self.session.recording.is_active() {
            Some("video recording active")
        } else {
            None
        }
    }

    pub(crate) fn handle_request_capture(&mut self) -> Task<Message> {
        if let Some(reason) = self.capture_blocker() {
            warn!(reason, "Ignoring capture request");
            return Task::none();
        }

        let seconds = self.session.timer_setting.seconds();
        if seconds == 0 {
            return self.capture_photo(false);
        }

        if self.session.countdown.is_running() {
            info!(seconds, "Restarting photo timer countdown");
        } else {
            info!(seconds, "Starting photo timer countdown");
        }
        let handle = self.session.countdown.start(seconds);
        Self::countdown_tick_task(handle)
    }

    fn countdown_tick_task(handle: CountdownHandle) -> Task<Message> {
        Self::delay_task(timing::COUNTDOWN_TICK, Message::CountdownTick(handle))
    }

    pub(crate) fn handle_countdown_tick(&mut self, handle: CountdownHandle) -> Task<Message> {
        match self.session.countdown.tick(handle) {
            Tick::Stale => {
                debug!(?handle, "Ignoring stale countdown tick");
                Task::none()
            }
            Tick::Running(remaining) => {
                info!(remaining, "Photo timer tick");
                Self::countdown_tick_task(handle)
            }
            Tick::Completed => {
                info!("Photo timer countdown complete - capturing");
                self.capture_photo(true)
            }
        }
    }

    pub(crate) fn handle_cancel_countdown(&mut self) -> Task<Message> {
        if self.session.countdown.cancel() {
            info!("Photo timer countdown aborted");
        }
        Task::none()
    }

    /// Issue the photo capture to the camera device
    fn capture_photo(&mut self, timed: bool) -> Task<Message> {
        self.session.capture = CaptureState::InFlight { timed };

        // Access can be revoked while the timer runs
        if !self.camera.permission_granted() {
            return Task::done(Message::PhotoCaptured(Err(
                CameraError::PermissionDenied.into()
            )));
        }

        info!(
            facing = %self.session.camera_facing,
            flash = self.session.flash_mode.is_on(),
            zoom = self.session.zoom_level,
            "Capturing photo"
        );
        Task::perform(self.camera.capture_photo(), |result| {
            Message::PhotoCaptured(result.map_err(BackendError::into_photo_error))
        })
    }

    pub(crate) fn handle_photo_captured(
        &mut self,
        result: Result<MediaReference, AppError>,
    ) -> Task<Message> {
        self.session.capture = CaptureState::Idle;
        self.session.countdown.cancel();

        match result {
            Ok(media) => {
                info!(path = %media, "Photo captured");
                self.session.captured_media = Some(media);
                Task::none()
            }
            Err(err) => {
                error!(error = %err, "Failed to capture photo");
                self.notify_error(&err)
            }
        }
    }

    // =========================================================================
    // Video Recording Handlers
    // =========================================================================

    pub(crate) fn handle_request_video_start(&mut self) -> Task<Message> {
        if let Some(reason) = self.capture_blocker() {
            warn!(reason, "Ignoring video start request");
            return Task::none();
        }

        if self.session.countdown.cancel() {
            info!("Photo timer countdown cancelled by video recording");
        }

        info!("Starting video recording");
        self.session.recording = RecordingState::Starting;
        Task::perform(self.camera.start_recording(), |result| {
            Message::RecordingStarted(result.map_err(BackendError::into_record_start_error))
        })
    }

    pub(crate) fn handle_recording_started(
        &mut self,
        result: Result<(), AppError>,
    ) -> Task<Message> {
        if self.session.recording != RecordingState::Starting {
            warn!(state = ?self.session.recording, "Unexpected recording start result");
            return Task::none();
        }

        match result {
            Ok(()) => {
                info!("Recording started successfully");
                self.session.recording = RecordingState::Recording {
                    start_time: Instant::now(),
                };
                Self::delay_task(
                    timing::RECORDING_DURATION_REFRESH,
                    Message::UpdateRecordingDuration,
                )
            }
            Err(err) => {
                error!(error = %err, "Failed to start recording");
                self.session.recording = RecordingState::Idle;
                self.notify_error(&err)
            }
        }
    }

    pub(crate) fn handle_request_video_stop(&mut self) -> Task<Message> {
        let RecordingState::Recording { start_time } = self.session.recording else {
            warn!(state = ?self.session.recording, "Ignoring stop request, not recording");
            return Task::none();
        };

        info!(
            elapsed = self.session.recording.elapsed_duration(),
            "Stopping video recording"
        );
        self.session.recording = RecordingState::Stopping { start_time };
        self.stop_recording_task()
    }

    /// Stop the recorder through the controller's current device handle
    pub(crate) fn stop_recording_task(&self) -> Task<Message> {
        Task::perform(self.camera.stop_recording(), |result| {
            Message::RecordingStopped(result.map_err(BackendError::into_record_stop_error))
        })
    }

    pub(crate) fn handle_recording_stopped(
        &mut self,
        result: Result<MediaReference, AppError>,
    ) -> Task<Message> {
        if !matches!(self.session.recording, RecordingState::Stopping { .. }) {
            warn!(state = ?self.session.recording, "Ignoring recording result, no stop pending");
            return Task::none();
        }
        self.session.recording = RecordingState::Idle;

        match result {
            Ok(media) => {
                info!(path = %media, "Recording finished");
                self.session.captured_media = Some(media);
                Task::none()
            }
            Err(err) => {
                error!(error = %err, "Failed to finish recording");
                self.notify_error(&err)
            }
        }
    }

    pub(crate) fn handle_update_recording_duration(&mut self) -> Task<Message> {
        if let RecordingState::Recording { .. } = self.session.recording {
            return Self::delay_task(
                timing::RECORDING_DURATION_REFRESH,
                Message::UpdateRecordingDuration,
            );
        }
        Task::none()
    }
}
