/// Whether a valid position has been received yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackingState {
    #[default]
    NoFix,
    Tracking,
}

/// Readiness of the current target to produce an arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmState {
    /// Not fired since the target was set or since the user left the hysteresis band
    Armed,
    /// Fired, must not fire again until the user leaves the hysteresis band
    Triggered,
}
