use crate::distance::distance;
use crate::domain::{ArmState, Coordinate, Target, TrackingState};
use tracing::{debug, info, instrument};

/// Width of the dead zone outside the radius in which a triggered geofence neither fires nor re-arms.
pub const DEFAULT_HYSTERESIS_M: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineInput {
    PositionUpdated(Coordinate),
    SetTarget {
        coordinate: Coordinate,
        radius_m: f64,
        label: Option<String>,
    },
    SetRadius(f64),
    ClearTarget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeofenceEvent {
    Arrived { distance_m: f64 },
    Rearmed { distance_m: f64 },
}

#[derive(Debug, Clone)]
struct Geofence {
    target: Target,
    arm: ArmState,
}

/// Tracks the latest position against at most one target and decides when an arrival fires.
///
/// Every input is applied atomically through [`GeofenceEngine::apply`], which returns the event (if any) the
/// caller has to act upon. The engine itself has no failure modes: radii are validated before they get here.
#[derive(Debug)]
pub struct GeofenceEngine {
    hysteresis_m: f64,
    position: Option<Coordinate>,
    geofence: Option<Geofence>,
}

impl GeofenceEngine {
    pub fn new(hysteresis_m: f64) -> Self {
        GeofenceEngine {
            hysteresis_m,
            position: None,
            geofence: None,
        }
    }

    #[instrument(skip(self))]
    pub fn apply(&mut self, input: EngineInput) -> Option<GeofenceEvent> {
        match input {
            EngineInput::PositionUpdated(coordinate) => {
                self.position = Some(coordinate);
                self.evaluate(true)
            }
            EngineInput::SetTarget { coordinate, radius_m, label } => {
                debug_assert!(radius_m > 0.0, "radius must be validated before reaching the engine");
                let target = Target::new(coordinate, radius_m, label);
                info!(radius_m, created_at = %target.created_at(), "🎯 Target set at {}, {}", coordinate.latitude, coordinate.longitude);
                self.geofence = Some(Geofence {
                    target,
                    arm: ArmState::Armed,
                });
                self.evaluate(false)
            }
            EngineInput::SetRadius(radius_m) => {
                debug_assert!(radius_m > 0.0, "radius must be validated before reaching the engine");
                let Some(geofence) = self.geofence.as_mut() else {
                    debug!(radius_m, "🎯 Ignoring radius change, no target set");
                    return None;
                };

                info!(from = geofence.target.radius_m(), to = radius_m, "🎯 Changed radius");
                geofence.target.set_radius_m(radius_m);
                self.evaluate(false)
            }
            EngineInput::ClearTarget => {
                if self.geofence.take().is_some() {
                    info!("🎯 Target cleared");
                }
                None
            }
        }
    }

    // Hysteresis is only evaluated on fixes: a command must never re-arm a triggered geofence.
    fn evaluate(&mut self, allow_rearm: bool) -> Option<GeofenceEvent> {
        let position = self.position?;
        let hysteresis_m = self.hysteresis_m;
        let geofence = self.geofence.as_mut()?;

        let distance_m = distance(position, geofence.target.coordinate());
        let radius_m = geofence.target.radius_m();
        debug!(distance_m, radius_m, arm = ?geofence.arm, "📏 Evaluating geofence");

        match geofence.arm {
            ArmState::Armed if distance_m <= radius_m => {
                geofence.arm = ArmState::Triggered;
                info!(distance_m, radius_m, "🏁 Arrived at target");
                Some(GeofenceEvent::Arrived { distance_m })
            }
            ArmState::Triggered if allow_rearm && distance_m > radius_m + hysteresis_m => {
                geofence.arm = ArmState::Armed;
                info!(distance_m, radius_m, "🔁 Left the hysteresis band, geofence re-armed");
                Some(GeofenceEvent::Rearmed { distance_m })
            }
            _ => None,
        }
    }

    pub fn tracking_state(&self) -> TrackingState {
        if self.position.is_some() { TrackingState::Tracking } else { TrackingState::NoFix }
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.position
    }

    pub fn target(&self) -> Option<&Target> {
        self.geofence.as_ref().map(|geofence| &geofence.target)
    }

    pub fn arm_state(&self) -> Option<ArmState> {
        self.geofence.as_ref().map(|geofence| geofence.arm)
    }

    /// Distance from the latest position to the target, recomputed on every call.
    pub fn distance_m(&self) -> Option<f64> {
        let position = self.position?;
        self.target().map(|target| distance(position, target.coordinate()))
    }
}

impl Default for GeofenceEngine {
    fn default() -> Self {
        GeofenceEngine::new(DEFAULT_HYSTERESIS_M)
    }
}
