use crate::domain::{ArmState, Fix, LocationError, Target, TrackingState};

/// Everything an observer of the session can see, published after every processed event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub tracking: TrackingState,
    pub position: Option<Fix>,
    pub target: Option<Target>,
    pub arm: Option<ArmState>,
    pub distance_m: Option<f64>,
    pub alarm_active: bool,
    pub arrival_message: Option<String>,
    pub location_error: Option<LocationError>,
}
