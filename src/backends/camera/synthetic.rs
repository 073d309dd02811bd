// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic camera device
//!
//! Renders a test pattern (or a still image used as the scene) instead of
//! reading a sensor. Facing, flash and zoom are applied to every rendered
//! frame so the output reflects the user's settings:
//!
//! - front camera: bars shifted, mirrored when `mirror_front` is set
//! - flash: every channel is brightened
//! - zoom: center crop scaled back to the output size
//!
//! Photos are written as JPEG, recordings as animated GIF, into the capture
//! cache directory.

use super::CameraDevice;
use super::types::{BackendError, BackendResult, CameraFacing, CameraSettings, MediaReference};
use crate::config::Config;
use crate::constants::{synthetic, timing, zoom};
use futures::future::{self, BoxFuture, FutureExt};
use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{Delay, DynamicImage, Frame, Rgb, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Color bars (75% SMPTE-style)
const BARS: [[u8; 3]; 7] = [
    [191, 191, 191],
    [191, 191, 0],
    [0, 191, 191],
    [0, 191, 0],
    [191, 0, 191],
    [191, 0, 0],
    [0, 0, 191],
];

/// Bar offset that tells the front camera's pattern apart from the back's
const FRONT_BAR_SHIFT: usize = 3;

/// Recording in progress
#[derive(Debug, Clone, Copy)]
struct ActiveRecording {
    started: Instant,
    settings: CameraSettings,
}

/// State shared between clones handed to async tasks
#[derive(Default)]
struct SharedState {
    permission: AtomicBool,
    settings: Mutex<CameraSettings>,
    recording: Mutex<Option<ActiveRecording>>,
}

/// Camera device producing rendered frames
#[derive(Clone)]
pub struct SyntheticCamera {
    output_dir: PathBuf,
    mirror_front: bool,
    grant_on_request: bool,
    scene: Option<Arc<RgbImage>>,
    state: Arc<SharedState>,
}

impl SyntheticCamera {
    /// Create a camera writing captures into `output_dir`
    ///
    /// Permission is granted on the first request.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            mirror_front: true,
            grant_on_request: true,
            scene: None,
            state: Arc::new(SharedState::default()),
        }
    }

    /// Camera writing into the configured capture cache
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.capture_cache_dir()).with_mirror_front(config.mirror_front_camera)
    }

    /// Whether front camera captures are mirrored
    pub fn with_mirror_front(mut self, mirror: bool) -> Self {
        self.mirror_front = mirror;
        self
    }

    /// Whether permission requests are granted
    pub fn with_permission(mut self, grant: bool) -> Self {
        self.grant_on_request = grant;
        self
    }

    /// Use a still image as the scene instead of the color bars
    pub fn with_scene_file(mut self, path: &Path) -> BackendResult<Self> {
        let scene = image::open(path)
            .map_err(|e| BackendError::Other(format!("{}: {}", path.display(), e)))?
            .resize_exact(
                synthetic::FRAME_WIDTH,
                synthetic::FRAME_HEIGHT,
                FilterType::Triangle,
            )
            .to_rgb8();
        info!(path = %path.display(), "Loaded scene image");
        self.scene = Some(Arc::new(scene));
        Ok(self)
    }

    /// Directory captures are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Settings most recently applied by the controller
    pub fn settings(&self) -> CameraSettings {
        *self
            .state
            .settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a recording is in progress
    pub fn is_recording(&self) -> bool {
        self.state
            .recording
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Render one frame with the given settings
    ///
    /// `phase` animates a marker across the frame so recordings show motion.
    pub fn render_frame(&self, settings: CameraSettings, phase: u32) -> RgbImage {
        render_frame(
            self.scene.as_deref(),
            settings,
            self.mirror_front,
            phase,
            synthetic::FRAME_WIDTH,
            synthetic::FRAME_HEIGHT,
        )
    }

    fn check_permission(&self) -> BackendResult<()> {
        if self.permission_granted() {
            Ok(())
        } else {
            Err(BackendError::PermissionDenied)
        }
    }
}

impl CameraDevice for SyntheticCamera {
    fn request_permission(&self) -> BoxFuture<'static, bool> {
        let granted = self.grant_on_request;
        self.state.permission.store(granted, Ordering::SeqCst);
        info!(granted, "Camera permission requested");
        future::ready(granted).boxed()
    }

    fn permission_granted(&self) -> bool {
        self.state.permission.load(Ordering::SeqCst)
    }

    fn configure(&self, settings: CameraSettings) -> BackendResult<()> {
        let settings = CameraSettings {
            zoom: zoom::clamp(settings.zoom),
            ..settings
        };
        *self
            .state
            .settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = settings;
        debug!(
            facing = %settings.facing,
            flash = ?settings.flash,
            zoom = settings.zoom,
            "Synthetic camera configured"
        );
        Ok(())
    }

    fn capture_photo(&self) -> BoxFuture<'static, BackendResult<MediaReference>> {
        if let Err(e) = self.check_permission() {
            return future::ready(Err(e)).boxed();
        }

        let camera = self.clone();
        let settings = self.settings();
        async move {
            let path = capture_path(camera.output_dir(), "jpg");
            info!(path = %path.display(), "Capturing photo");

            tokio::task::spawn_blocking(move || {
                let frame = camera.render_frame(settings, 0);
                write_jpeg(&frame, &path)?;
                Ok(MediaReference::photo(path))
            })
            .await
            .unwrap_or_else(|e| Err(BackendError::Other(format!("Task join error: {}", e))))
        }
        .boxed()
    }

    fn start_recording(&self) -> BoxFuture<'static, BackendResult<()>> {
        let result = self.check_permission().and_then(|()| {
            let mut recording = self
                .state
                .recording
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if recording.is_some() {
                return Err(BackendError::RecordingInProgress);
            }
            *recording = Some(ActiveRecording {
                started: Instant::now(),
                settings: self.settings(),
            });
            info!("Synthetic recording started");
            Ok(())
        });
        future::ready(result).boxed()
    }

    fn stop_recording(&self) -> BoxFuture<'static, BackendResult<MediaReference>> {
        let active = self
            .state
            .recording
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(active) = active else {
            return future::ready(Err(BackendError::NoRecordingInProgress)).boxed();
        };

        let camera = self.clone();
        async move {
            let elapsed = active.started.elapsed();
            let frame_count = ((elapsed.as_secs_f32() * timing::RECORDING_FPS as f32).ceil()
                as u32)
                .clamp(1, timing::MAX_RECORDING_FRAMES);
            let path = capture_path(camera.output_dir(), "gif");
            info!(
                path = %path.display(),
                frames = frame_count,
                elapsed_ms = elapsed.as_millis() as u64,
                "Finalizing recording"
            );

            tokio::task::spawn_blocking(move || {
                let frames = (0..frame_count).map(|phase| {
                    let full = camera.render_frame(active.settings, phase);
                    let small = imageops::resize(
                        &full,
                        synthetic::RECORDING_WIDTH,
                        synthetic::RECORDING_HEIGHT,
                        FilterType::Triangle,
                    );
                    Frame::from_parts(
                        DynamicImage::ImageRgb8(small).to_rgba8(),
                        0,
                        0,
                        Delay::from_numer_denom_ms(1000, timing::RECORDING_FPS),
                    )
                });
                write_gif(frames, &path)?;
                Ok(MediaReference::video(path))
            })
            .await
            .unwrap_or_else(|e| Err(BackendError::Other(format!("Task join error: {}", e))))
        }
        .boxed()
    }
}

/// Unique file path in the capture cache
fn capture_path(dir: &Path, extension: &str) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let id = uuid::Uuid::new_v4().simple().to_string();
    dir.join(format!("capture_{}_{}.{}", timestamp, &id[..8], extension))
}

fn write_jpeg(frame: &RgbImage, path: &Path) -> BackendResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    frame.write_with_encoder(JpegEncoder::new_with_quality(
        &mut writer,
        synthetic::JPEG_QUALITY,
    ))?;
    Ok(())
}

fn write_gif(frames: impl IntoIterator<Item = Frame>, path: &Path) -> BackendResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new(writer);
    if let Err(e) = encoder.set_repeat(Repeat::Infinite) {
        warn!(error = %e, "Could not set GIF loop flag");
    }
    encoder.encode_frames(frames)?;
    Ok(())
}

/// Render a frame: scene, then zoom, mirroring and flash
fn render_frame(
    scene: Option<&RgbImage>,
    settings: CameraSettings,
    mirror_front: bool,
    phase: u32,
    width: u32,
    height: u32,
) -> RgbImage {
    let mut frame = match scene {
        Some(scene) => scene.clone(),
        None => color_bars(settings.facing, width, height),
    };

    draw_marker(&mut frame, phase);

    let magnification = 1.0 + zoom::clamp(settings.zoom) * (zoom::MAX_MAGNIFICATION - 1.0);
    if magnification > 1.0 {
        frame = zoom_crop(&frame, magnification);
    }

    if settings.facing == CameraFacing::Front && mirror_front {
        imageops::flip_horizontal_in_place(&mut frame);
    }

    if settings.flash.is_on() {
        for pixel in frame.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = channel.saturating_add(synthetic::FLASH_BOOST);
            }
        }
    }

    frame
}

/// Color bars on top, luma ramp underneath
fn color_bars(facing: CameraFacing, width: u32, height: u32) -> RgbImage {
    let bars_height = height * 2 / 3;
    RgbImage::from_fn(width, height, |x, y| {
        if y < bars_height {
            let mut index = ((x as usize * BARS.len()) / width as usize).min(BARS.len() - 1);
            if facing == CameraFacing::Front {
                index = (index + FRONT_BAR_SHIFT) % BARS.len();
            }
            Rgb(BARS[index])
        } else {
            let v = ((x * 255) / width.max(1)) as u8;
            Rgb([v, v, v])
        }
    })
}

/// White square sweeping across the middle of the frame
fn draw_marker(frame: &mut RgbImage, phase: u32) {
    let (width, height) = frame.dimensions();
    let size = (height / 8).max(1);
    let travel = width.saturating_sub(size).max(1);
    let x0 = (phase * size) % travel;
    let y0 = height / 2 - size / 2;
    for y in y0..(y0 + size).min(height) {
        for x in x0..(x0 + size).min(width) {
            frame.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
}

fn zoom_crop(frame: &RgbImage, magnification: f32) -> RgbImage {
    let (width, height) = frame.dimensions();
    let crop_w = ((width as f32 / magnification).round() as u32).clamp(1, width);
    let crop_h = ((height as f32 / magnification).round() as u32).clamp(1, height);
    let x = (width - crop_w) / 2;
    let y = (height - crop_h) / 2;
    let cropped = imageops::crop_imm(frame, x, y, crop_w, crop_h).to_image();
    imageops::resize(&cropped, width, height, FilterType::Triangle)
}
