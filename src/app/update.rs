// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! This module handles all application messages by routing them to focused handler methods.
//! The main `update()` function acts as a dispatcher, while specific handlers are implemented
//! in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::camera`: Facing, flash, zoom
//! - `handlers::capture`: Shutter, self-timer, photo capture, video recording
//! - `handlers::ui`: Timer picker, notifications
//! - `handlers::system`: Permissions, preview save/discard, shutdown

use crate::app::state::{AppModel, Message};
use crate::app::task::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    ///
    /// Runs synchronously to completion; anything asynchronous comes back as
    /// a [`Task`] whose futures resolve to follow-up messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ===== Permissions =====
            Message::RequestPermissions => self.handle_request_permissions(),
            Message::PermissionsResolved { camera, media } => {
                self.handle_permissions_resolved(camera, media)
            }

            // ===== Camera Controls =====
            Message::ToggleFacing => self.handle_toggle_facing(),
            Message::ToggleFlash => self.handle_toggle_flash(),
            Message::SetZoom(level) => self.handle_set_zoom(level),
            Message::PinchZoom { scale } => self.handle_pinch_zoom(scale),
            Message::ZoomIn => self.handle_zoom_in(),
            Message::ZoomOut => self.handle_zoom_out(),
            Message::ResetZoom => self.handle_reset_zoom(),

            // ===== Timer =====
            Message::ToggleTimerPicker => self.handle_toggle_timer_picker(),
            Message::CloseTimerPicker => self.handle_close_timer_picker(),
            Message::SelectTimer(setting) => self.handle_select_timer(setting),
            Message::CycleTimer => self.handle_cycle_timer(),

            // ===== Photo Capture =====
            Message::RequestCapture => self.handle_request_capture(),
            Message::CountdownTick(handle) => self.handle_countdown_tick(handle),
            Message::CancelCountdown => self.handle_cancel_countdown(),
            Message::PhotoCaptured(result) => self.handle_photo_captured(result),

            // ===== Video =====
            Message::RequestVideoStart => self.handle_request_video_start(),
            Message::RecordingStarted(result) => self.handle_recording_started(result),
            Message::RequestVideoStop => self.handle_request_video_stop(),
            Message::RecordingStopped(result) => self.handle_recording_stopped(result),
            Message::UpdateRecordingDuration => self.handle_update_recording_duration(),

            // ===== Preview =====
            Message::DiscardPreview => self.handle_discard_preview(),
            Message::SavePreview => self.handle_save_preview(),
            Message::PreviewSaved { media, result } => self.handle_preview_saved(media, result),

            // ===== Notifications =====
            Message::DismissNotification(id) => self.handle_dismiss_notification(id),

            // ===== Lifecycle =====
            Message::Shutdown => self.handle_shutdown(),
        }
    }
}
