use thiserror::Error;

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission was denied")]
    PermissionDenied,
    #[error("the current position is unavailable")]
    PositionUnavailable,
    #[error("timed out while waiting for a position")]
    Timeout,
    #[error("this device does not support location services")]
    Unsupported,
}
