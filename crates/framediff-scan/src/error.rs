//! Error types for scan operations
//!
//! Provides typed errors that library users can match and handle specifically.

use thiserror::Error;

/// Errors that can occur while driving a scan
///
/// Backend failures are surfaced per tick and never retried within the tick;
/// the caller skips the tick and tries again on the next one. Expected
/// control flow (no prior snapshot, mode change) is not an error.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Failed to acquire the capture backend's frame lock
    ///
    /// The backend contract is a bounded-duration lock; a failure here
    /// usually means the video subsystem is mid reconfiguration.
    #[error("Failed to lock frame buffer: {0}")]
    LockFailed(String),

    /// The backend could not refresh its pixel data
    #[error("Frame refresh failed: {0}")]
    RefreshFailed(String),

    /// The backend handed out an inconsistent buffer view
    ///
    /// Covers stride/size mismatches and invalid pixel formats reported by
    /// the buffer layer.
    #[error("Invalid frame view: {0}")]
    BadFrame(#[from] framediff_pixels::BufferError),

    /// Invalid configuration
    ///
    /// One message per rejected field, as reported by
    /// [`ScanConfig::validate`](crate::ScanConfig::validate).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for scan operations
///
/// This is a convenience alias for `Result<T, ScanError>`.
pub type Result<T> = std::result::Result<T, ScanError>;

// Helper implementations for common error patterns
impl ScanError {
    /// Create a lock failure error
    pub(crate) fn lock_failed(msg: impl Into<String>) -> Self {
        Self::LockFailed(msg.into())
    }

    /// Create a refresh failure error
    #[allow(dead_code)]
    pub(crate) fn refresh_failed(msg: impl Into<String>) -> Self {
        Self::RefreshFailed(msg.into())
    }

    /// Create an invalid config error from validation messages
    pub(crate) fn invalid_config(issues: &[String]) -> Self {
        Self::InvalidConfig(issues.join("; "))
    }
}
