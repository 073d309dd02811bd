// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera application

use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Recording-related errors
    Recording(RecordingError),
    /// Photo capture errors
    Photo(PhotoError),
    /// Configuration errors
    Config(String),
    /// Media library errors
    Storage(StorageError),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Camera access was not granted
    PermissionDenied,
    /// Camera disconnected during operation
    Disconnected,
    /// Backend error
    BackendError(String),
    /// Camera is busy or in use
    Busy,
}

/// Recording-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingError {
    /// Failed to start recording
    StartFailed(String),
    /// Failed to stop recording
    StopFailed(String),
    /// Recording already in progress
    AlreadyRecording,
    /// No recording to stop
    NotRecording,
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Capture failed
    CaptureFailed(String),
    /// Encoding failed
    EncodingFailed(String),
}

/// Media library errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Media library access was not granted
    PermissionDenied,
    /// The captured file no longer exists
    MissingSource(PathBuf),
    /// Filesystem error while persisting
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Recording(e) => write!(f, "Recording error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied => write!(f, "No access to camera"),
            CameraError::Disconnected => write!(f, "Camera disconnected"),
            CameraError::BackendError(msg) => write!(f, "Backend error: {}", msg),
            CameraError::Busy => write!(f, "Camera is busy"),
        }
    }
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingError::StartFailed(msg) => write!(f, "Failed to start recording: {}", msg),
            RecordingError::StopFailed(msg) => write!(f, "Failed to stop recording: {}", msg),
            RecordingError::AlreadyRecording => write!(f, "Recording already in progress"),
            RecordingError::NotRecording => write!(f, "No recording in progress"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::PermissionDenied => write!(f, "No access to media library"),
            StorageError::MissingSource(path) => {
                write!(f, "Captured file is missing: {}", path.display())
            }
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl AppError {
    /// Message shown to the user, without the error category prefix
    pub fn user_message(&self) -> String {
        match self {
            AppError::Camera(e) => e.to_string(),
            AppError::Recording(e) => e.to_string(),
            AppError::Photo(e) => e.to_string(),
            AppError::Storage(e) => e.to_string(),
            AppError::Config(_) | AppError::Other(_) => self.to_string(),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for RecordingError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for StorageError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<RecordingError> for AppError {
    fn from(err: RecordingError) -> Self {
        AppError::Recording(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.into())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        PhotoError::EncodingFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_wraps_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Storage(StorageError::Io(_))));
        assert!(err.to_string().starts_with("Storage error"));
    }

    #[test]
    fn test_permission_messages() {
        assert_eq!(CameraError::PermissionDenied.to_string(), "No access to camera");
        assert_eq!(
            StorageError::PermissionDenied.to_string(),
            "No access to media library"
        );
    }

    #[test]
    fn test_user_message_drops_category() {
        let err: AppError = CameraError::Disconnected.into();
        assert_eq!(err.to_string(), "Camera error: Camera disconnected");
        assert_eq!(err.user_message(), "Camera disconnected");
        assert_eq!(AppError::from("boom").user_message(), "boom");
    }
}
