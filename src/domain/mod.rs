pub mod commands;
mod coordinate;
mod fix;
mod location_error;
mod place;
mod states;
mod target;

pub use coordinate::Coordinate;
pub use fix::{Fix, FixAccuracyTier};
pub use location_error::LocationError;
pub use place::Place;
pub use states::{ArmState, TrackingState};
pub use target::Target;
