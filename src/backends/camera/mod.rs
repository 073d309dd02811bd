// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! The capture controller only talks to a camera through the [`CameraDevice`]
//! trait, which keeps the state machine independent of the platform.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │ Capture Controller  │
//! └──────────┬──────────┘
//!            │  Arc<dyn CameraDevice>
//!            ▼
//! ┌─────────────────────┐
//! │  CameraDevice Trait │  ← Common interface
//! └──────────┬──────────┘
//!            │
//!            ▼
//!     ┌─────────────┐
//!     │  Synthetic  │  ← Test-pattern implementation
//!     └─────────────┘
//! ```

pub mod synthetic;
pub mod types;

pub use synthetic::SyntheticCamera;
pub use types::*;

use futures::future::BoxFuture;

/// Camera device interface used by the capture controller
///
/// Async operations return `'static` futures so the controller can hand them
/// to the runtime without borrowing the device. Implementations clone whatever
/// shared state they need into the future.
pub trait CameraDevice: Send + Sync {
    // ===== Permissions =====

    /// Ask the platform for camera access
    ///
    /// Resolves to `true` if access was granted.
    fn request_permission(&self) -> BoxFuture<'static, bool>;

    /// Whether camera access is currently granted
    ///
    /// Captures are only attempted while this returns `true`.
    fn permission_granted(&self) -> bool;

    // ===== Configuration =====

    /// Apply facing, flash and zoom
    ///
    /// Called every time the user changes one of them. Subsequent preview
    /// frames and captures use the new settings.
    fn configure(&self, settings: CameraSettings) -> BackendResult<()>;

    // ===== Capture: Photo =====

    /// Capture a single photo with the current settings
    ///
    /// # Returns
    /// * `Ok(MediaReference)` - Photo written to the capture cache
    /// * `Err(BackendError)` - Capture failed
    fn capture_photo(&self) -> BoxFuture<'static, BackendResult<MediaReference>>;

    // ===== Capture: Video =====

    /// Start video recording
    ///
    /// Only one recording can be active at a time.
    ///
    /// # Returns
    /// * `Ok(())` - Recording started
    /// * `Err(BackendError::RecordingInProgress)` - Already recording
    fn start_recording(&self) -> BoxFuture<'static, BackendResult<()>>;

    /// Stop the active recording and finalize the file
    ///
    /// # Returns
    /// * `Ok(MediaReference)` - The finished recording
    /// * `Err(BackendError::NoRecordingInProgress)` - No active recording
    fn stop_recording(&self) -> BoxFuture<'static, BackendResult<MediaReference>>;
}
