use crate::domain::Coordinate;
use std::fmt::Debug;
use std::io::Write;
use tracing::{info, warn};

/// Audible or visual alarm presentation. The session only ever tells it what to do, it never asks for its state.
pub trait AlarmSink: Debug + Send + Sync {
    fn raise(&self);

    fn silence(&self);

    fn show_message(&self, text: &str);
}

/// Map surface the session can ask to focus on a coordinate.
pub trait MapView: Debug + Send + Sync {
    fn focus(&self, coordinate: Coordinate);
}

/// Rings the terminal bell and logs the alarm.
#[derive(Debug, Default)]
pub struct TerminalAlarm;

impl AlarmSink for TerminalAlarm {
    fn raise(&self) {
        warn!("🔔 You have arrived!");
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            warn!("⚠️ Unable to ring the terminal bell: {}", e);
        }
    }

    fn silence(&self) {
        info!("🔕 Alarm silenced");
    }

    fn show_message(&self, text: &str) {
        info!("💬 {}", text);
    }
}

#[derive(Debug, Default)]
pub struct LoggingMapView;

impl MapView for LoggingMapView {
    fn focus(&self, coordinate: Coordinate) {
        info!("🗺️ Focusing map on {}, {}", coordinate.latitude, coordinate.longitude);
    }
}
