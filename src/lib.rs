// SPDX-License-Identifier: MPL-2.0

//! Shutter - a countdown-timer camera
//!
//! This library provides the capture core of the Shutter camera: live view
//! state, self-timer countdown, photo capture, video recording, preview, and
//! saving to the media library.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Capture controller, countdown timer and message runtime
//! - [`backends`]: Camera device abstraction
//! - [`config`]: User configuration handling
//! - [`storage`]: Media library
//! - [`terminal`]: Terminal front-end
//!
//! # Example
//!
//! ```ignore
//! let config = Config::load()?;
//! let model = AppModel::new(
//!     config.clone(),
//!     Arc::new(SyntheticCamera::from_config(&config)),
//!     Arc::new(MediaLibrary::from_config(&config)),
//! );
//! let (runtime, handle) = Runtime::new(model);
//! tokio::spawn(runtime.run());
//! handle.dispatch(Message::RequestCapture);
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, CaptureView, Message, Runtime, RuntimeHandle, Snapshot};
pub use config::Config;
pub use constants::TimerSetting;
pub use errors::{AppError, AppResult};
