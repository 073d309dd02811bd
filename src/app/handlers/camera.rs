// SPDX-License-Identifier: GPL-3.0-only

//! Camera control handlers
//!
//! Facing, flash and zoom. Every change is pushed to the camera device as a
//! full [`CameraSettings`](crate::backends::camera::CameraSettings) value.

use crate::app::state::{AppModel, Message};
use crate::app::task::Task;
use crate::constants::zoom;
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Camera Control Handlers
    // =========================================================================

    /// Push the current settings to the camera device
    pub(crate) fn apply_camera_settings(&self) {
        let settings = self.session.camera_settings();
        if let Err(err) = self.camera.configure(settings) {
            warn!(error = %err, ?settings, "Failed to apply camera settings");
        }
    }

    pub(crate) fn handle_toggle_facing(&mut self) -> Task<Message> {
        self.session.camera_facing = self.session.camera_facing.flipped();
        info!(facing = %self.session.camera_facing, "Camera switched");
        self.apply_camera_settings();
        Task::none()
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task<Message> {
        self.session.flash_mode = self.session.flash_mode.toggled();
        info!(flash_enabled = self.session.flash_mode.is_on(), "Flash toggled");
        self.apply_camera_settings();
        Task::none()
    }

    /// Store a new zoom level, skipping the device update when nothing changed
    fn set_zoom_level(&mut self, level: f32) {
        let level = zoom::clamp(level);
        if level == self.session.zoom_level {
            return;
        }
        self.session.zoom_level = level;
        debug!(zoom = level, "Zoom changed");
        self.apply_camera_settings();
    }

    pub(crate) fn handle_set_zoom(&mut self, level: f32) -> Task<Message> {
        self.set_zoom_level(level);
        Task::none()
    }

    pub(crate) fn handle_pinch_zoom(&mut self, scale: f32) -> Task<Message> {
        let step = self.config.pinch_step;
        let delta = if scale > 1.0 {
            step
        } else if scale < 1.0 {
            -step
        } else {
            // No change, or NaN
            return Task::none();
        };

        let target = self.session.zoom_level + delta;
        if target < zoom::MIN - zoom::BOUND_SLACK || target > zoom::MAX + zoom::BOUND_SLACK {
            debug!(zoom = self.session.zoom_level, delta, "Pinch step out of range, ignored");
            return Task::none();
        }
        self.set_zoom_level(target);
        Task::none()
    }

    pub(crate) fn handle_zoom_in(&mut self) -> Task<Message> {
        self.set_zoom_level(self.session.zoom_level + zoom::BUTTON_STEP);
        Task::none()
    }

    pub(crate) fn handle_zoom_out(&mut self) -> Task<Message> {
        self.set_zoom_level(self.session.zoom_level - zoom::BUTTON_STEP);
        Task::none()
    }

    pub(crate) fn handle_reset_zoom(&mut self) -> Task<Message> {
        self.set_zoom_level(zoom::MIN);
        Task::none()
    }
}
