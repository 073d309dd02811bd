// SPDX-License-Identifier: GPL-3.0-only

//! UI state handlers: timer picker and notifications

use crate::app::state::{AppModel, Message, Notification, NotificationKind};
use crate::app::task::Task;
use crate::constants::TimerSetting;
use crate::errors::AppError;
use std::time::Duration;
use tracing::{debug, info};

impl AppModel {
    // =========================================================================
    // Timer Picker Handlers
    // =========================================================================

    pub(crate) fn handle_toggle_timer_picker(&mut self) -> Task<Message> {
        self.session.timer_picker_visible = !self.session.timer_picker_visible;
        Task::none()
    }

    pub(crate) fn handle_close_timer_picker(&mut self) -> Task<Message> {
        self.session.timer_picker_visible = false;
        Task::none()
    }

    pub(crate) fn handle_select_timer(&mut self, setting: TimerSetting) -> Task<Message> {
        self.session.timer_setting = setting;
        self.session.timer_picker_visible = false;
        info!(timer = %setting, "Photo timer setting changed");
        Task::none()
    }

    pub(crate) fn handle_cycle_timer(&mut self) -> Task<Message> {
        self.session.timer_setting = self.session.timer_setting.next();
        info!(timer = %self.session.timer_setting, "Photo timer setting changed");
        Task::none()
    }

    // =========================================================================
    // Notification Handlers
    // =========================================================================

    /// Show a notification and schedule its dismissal
    pub(crate) fn notify(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Task<Message> {
        self.next_notification_id += 1;
        let id = self.next_notification_id;
        self.session.notification = Some(Notification {
            id,
            kind,
            message: message.into(),
        });
        Self::delay_task(
            Duration::from_secs(self.config.notification_secs),
            Message::DismissNotification(id),
        )
    }

    pub(crate) fn notify_error(&mut self, err: &AppError) -> Task<Message> {
        self.notify(NotificationKind::Error, err.user_message())
    }

    pub(crate) fn handle_dismiss_notification(&mut self, id: u64) -> Task<Message> {
        if self.session.notification.as_ref().map(|n| n.id) == Some(id) {
            self.session.notification = None;
        } else {
            debug!(id, "Notification already replaced");
        }
        Task::none()
    }
}
