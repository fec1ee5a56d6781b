use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SensorError {
    #[error("{0} is not available on this platform")]
    CapabilityUnavailable(&'static str),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("no orientation data within {0:?}")]
    Timeout(Duration),
    #[error("sensor error: {0}")]
    Platform(String),
    /// Malformed or NaN sample. Dropped where it occurs, never surfaced to the user.
    #[error("malformed orientation reading")]
    Transient,
}

/// Both orientation sources failed; the session stays disabled.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("no orientation source available (primary: {primary}; fallback: {fallback})")]
pub struct MotionError {
    pub primary: SensorError,
    pub fallback: SensorError,
}

impl MotionError {
    /// Message shown to the user.
    pub fn user_message(&self) -> &'static str {
        if matches!(self.fallback, SensorError::PermissionDenied(_)) {
            "Motion access was denied. Allow motion sensors and try again."
        } else {
            "Motion sensors are not available on this device."
        }
    }
}
