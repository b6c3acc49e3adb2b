mod controller;
mod handle;
mod sinks;
mod snapshot;

pub use controller::{Session, SessionSettings, Sinks};
pub use handle::{SessionError, SessionHandle};
pub use sinks::{AlarmSink, LoggingMapView, MapView, TerminalAlarm};
pub use snapshot::SessionSnapshot;
