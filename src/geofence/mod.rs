mod engine;

pub use engine::{EngineInput, GeofenceEngine, GeofenceEvent};
