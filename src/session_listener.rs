use crate::domain::LocationError;
use crate::session::SessionSnapshot;
use tokio::sync::watch::Receiver;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;
use tracing::{info, instrument};

/// Logs session progress until location tracking fails for good, returning that failure.
#[instrument(skip_all)]
pub async fn session_listener(rx: Receiver<SessionSnapshot>) -> Option<LocationError> {
    let mut snapshots = WatchStream::from_changes(rx);
    let mut previous = SessionSnapshot::default();

    while let Some(snapshot) = snapshots.next().await {
        if let Some(message) = describe(&previous, &snapshot) {
            let accuracy_m = snapshot.position.as_ref().and_then(|fix| fix.accuracy_m);
            info!(distance_m = snapshot.distance_m, accuracy_m, "{}", message);
        }

        if let Some(error) = snapshot.location_error {
            return Some(error);
        }
        previous = snapshot;
    }

    None
}

fn describe(previous: &SessionSnapshot, current: &SessionSnapshot) -> Option<String> {
    if current.alarm_active && !previous.alarm_active {
        return Some("🔔 Arrived".to_string());
    }

    if let (Some(message), None) = (&current.arrival_message, &previous.arrival_message) {
        return Some(format!("💬 {}", message));
    }

    let distance_m = current.distance_m?;
    let moved = previous.distance_m.is_none_or(|previous_m| (previous_m - distance_m).abs() >= 1.0);
    moved.then(|| format!("📏 {:.0} m to go", distance_m))
}
