// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing the self-timer presets
//! - Taking photos
//! - Recording videos
//!
//! Both capture commands drive the same capture controller as the terminal
//! front-end, through a [`Runtime`] and the messages a user would send.

use shutter::app::{
    AccessState, AppModel, Message, NotificationKind, Runtime, RuntimeHandle, Snapshot,
};
use shutter::backends::camera::{CameraFacing, FlashMode, MediaReference, SyntheticCamera};
use shutter::config::Config;
use shutter::constants::TimerSetting;
use shutter::errors::CameraError;
use shutter::storage::MediaLibrary;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::warn;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Options for `shutter photo`
pub struct PhotoOptions {
    pub timer: TimerSetting,
    pub facing: Option<CameraFacing>,
    pub flash: bool,
    pub zoom: Option<f32>,
    pub scene: Option<PathBuf>,
    /// Add the photo to the media library
    pub save: bool,
}

/// List the self-timer presets
pub fn list_timers(config: &Config) {
    println!("Self-timer presets:");
    println!();
    for setting in TimerSetting::ALL {
        let marker = if setting == config.default_timer {
            " (default)"
        } else {
            ""
        };
        match setting {
            TimerSetting::Off => {
                println!("  {:>3}  capture immediately{}", setting.label(), marker)
            }
            _ => println!(
                "  {:>3}  {} second countdown{}",
                setting.label(),
                setting.seconds(),
                marker
            ),
        }
    }
}

/// Take a photo, optionally after a countdown
pub fn take_photo(mut config: Config, options: PhotoOptions) -> CliResult<()> {
    config.default_timer = options.timer;
    if let Some(facing) = options.facing {
        config.default_facing = facing;
    }
    if options.flash {
        config.default_flash = FlashMode::On;
    }

    let mut camera = SyntheticCamera::from_config(&config);
    if let Some(scene) = &options.scene {
        camera = camera.with_scene_file(scene)?;
    }
    let library = MediaLibrary::from_config(&config);
    println!("Using {} camera", config.default_facing);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let session = Session::start(config, camera, library);
        session.wait_for_access().await?;

        if let Some(zoom) = options.zoom {
            session.handle.dispatch(Message::SetZoom(zoom));
        }
        session.handle.dispatch(Message::RequestCapture);

        let mut last_shown = None;
        let media = session
            .wait_for_preview(|snapshot| {
                if snapshot.is_counting_down
                    && snapshot.remaining_seconds > 0
                    && last_shown != Some(snapshot.remaining_seconds)
                {
                    last_shown = Some(snapshot.remaining_seconds);
                    println!("{}...", snapshot.remaining_seconds);
                }
            })
            .await?;

        if options.save {
            let path = session.save(&media).await?;
            println!("Photo saved: {}", path.display());
        } else {
            println!("Photo captured: {}", media);
        }

        session.close().await;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Record a video for `duration` seconds (Ctrl+C stops early)
pub fn record_video(
    mut config: Config,
    duration: u64,
    facing: Option<CameraFacing>,
    save: bool,
) -> CliResult<()> {
    if let Some(facing) = facing {
        config.default_facing = facing;
    }
    let camera = SyntheticCamera::from_config(&config);
    let library = MediaLibrary::from_config(&config);
    println!("Using {} camera", config.default_facing);
    println!("Duration: {} seconds", duration);

    // Set up Ctrl+C handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = Arc::clone(&stop_flag);
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let session = Session::start(config, camera, library);
        session.wait_for_access().await?;

        session.handle.dispatch(Message::RequestVideoStart);
        let snapshot = session
            .handle
            .wait_for(|s| s.is_recording_video || error_message(s).is_some())
            .await
            .ok_or("Capture session ended unexpectedly")?;
        if let Some(message) = error_message(&snapshot) {
            return Err(message.into());
        }

        println!();
        println!("Recording... (press Ctrl+C to stop early)");

        // Wait for duration or Ctrl+C
        let start = tokio::time::Instant::now();
        let target_duration = Duration::from_secs(duration);
        while start.elapsed() < target_duration {
            if stop_flag.load(Ordering::SeqCst) {
                println!();
                println!("Stopping early...");
                break;
            }

            // Print progress
            let elapsed = start.elapsed().as_secs();
            print!("\rRecording: {:02}:{:02}", elapsed / 60, elapsed % 60);
            std::io::Write::flush(&mut std::io::stdout())?;

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        println!();

        session.handle.dispatch(Message::RequestVideoStop);
        let media = session.wait_for_preview(|_| {}).await?;

        if save {
            let path = session.save(&media).await?;
            println!("Video saved: {}", path.display());
        } else {
            println!("Video recorded: {}", media);
        }

        session.close().await;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Text of the current error notification, if any
fn error_message(snapshot: &Snapshot) -> Option<String> {
    snapshot
        .notification
        .as_ref()
        .filter(|n| n.kind == NotificationKind::Error)
        .map(|n| n.message.clone())
}

/// A capture session running on the current tokio runtime
struct Session {
    handle: RuntimeHandle,
    runtime: tokio::task::JoinHandle<AppModel>,
}

impl Session {
    fn start(config: Config, camera: SyntheticCamera, library: MediaLibrary) -> Self {
        let model = AppModel::new(config, Arc::new(camera), Arc::new(library));
        let (runtime, handle) = Runtime::new(model);
        Self {
            handle,
            runtime: tokio::spawn(runtime.run()),
        }
    }

    async fn wait_for_access(&self) -> CliResult<()> {
        let snapshot = self
            .handle
            .wait_for(|s| s.camera_access != AccessState::Pending)
            .await
            .ok_or("Capture session ended unexpectedly")?;
        if snapshot.camera_access == AccessState::Denied {
            return Err(CameraError::PermissionDenied.into());
        }
        if snapshot.media_access == AccessState::Denied {
            warn!("No access to media library, saving will fail");
        }
        Ok(())
    }

    /// Wait until captured media is being previewed
    ///
    /// `progress` sees every snapshot published while waiting.
    async fn wait_for_preview(
        &self,
        mut progress: impl FnMut(&Snapshot),
    ) -> CliResult<MediaReference> {
        let snapshot = self
            .handle
            .wait_for(|s| {
                progress(s);
                s.captured_media.is_some() || error_message(s).is_some()
            })
            .await
            .ok_or("Capture session ended unexpectedly")?;

        let message = error_message(&snapshot);
        match (snapshot.captured_media, message) {
            (Some(media), _) => Ok(media),
            (None, Some(message)) => Err(message.into()),
            (None, None) => Err("Capture produced no media".into()),
        }
    }

    /// Save the previewed media and return the library file
    async fn save(&self, media: &MediaReference) -> CliResult<PathBuf> {
        self.handle.dispatch(Message::SavePreview);
        let snapshot = self
            .handle
            .wait_for(|s| s.captured_media.as_ref() != Some(media) || error_message(s).is_some())
            .await
            .ok_or("Capture session ended unexpectedly")?;

        if snapshot.captured_media.as_ref() == Some(media)
            && let Some(message) = error_message(&snapshot)
        {
            return Err(message.into());
        }
        if let Some(notification) = &snapshot.notification {
            println!("{}", notification.message);
        }
        snapshot
            .last_saved
            .ok_or_else(|| "Save finished without a library path".into())
    }

    async fn close(self) {
        self.handle.shutdown();
        if let Err(e) = self.runtime.await {
            warn!(error = %e, "Capture runtime ended abnormally");
        }
    }
}
