// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! # Modules
//!
//! - [`camera`]: Camera device trait, shared types and the synthetic device

pub mod camera;
