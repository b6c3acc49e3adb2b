use crate::domain::{Coordinate, LocationError};
use futures::stream::BoxStream;
use std::fmt::Debug;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_fix_age: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown(u16),
}

impl From<PlatformError> for LocationError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::PermissionDenied => LocationError::PermissionDenied,
            PlatformError::PositionUnavailable | PlatformError::Unknown(_) => LocationError::PositionUnavailable,
            PlatformError::Timeout => LocationError::Timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Fix { coordinate: Coordinate, accuracy_m: Option<f64> },
    Error(PlatformError),
}

/// A position watch on the device.
///
/// The returned stream is the subscription: the platform keeps producing readings until the stream is dropped.
/// Devices without any location capability return [`LocationError::Unsupported`].
pub trait LocationPlatform: Debug + Send + Sync {
    fn watch_position(&self, options: WatchOptions) -> Result<BoxStream<'static, Reading>, LocationError>;
}
