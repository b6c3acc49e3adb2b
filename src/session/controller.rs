use crate::app_config::AppConfig;
use crate::domain::commands::Command;
use crate::domain::{Fix, LocationError};
use crate::geofence::{EngineInput, GeofenceEngine, GeofenceEvent};
use crate::location::{LocationSource, LocationStatus};
use crate::messages::{Arrival, ArrivalMessageProvider, message_or_fallback};
use crate::session::sinks::{AlarmSink, MapView};
use crate::session::snapshot::SessionSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, Receiver, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub default_radius_m: f64,
    pub hysteresis_m: f64,
    pub alarm_duration: Duration,
    pub message_timeout: Duration,
    pub fallback_message: String,
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        SessionSettings {
            default_radius_m: config.geofence().default_radius_m(),
            hysteresis_m: config.geofence().hysteresis_m(),
            alarm_duration: config.alarm().duration(),
            message_timeout: config.messages().timeout(),
            fallback_message: config.messages().fallback().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Sinks {
    pub alarm: Arc<dyn AlarmSink>,
    pub map: Arc<dyn MapView>,
    pub messages: Arc<dyn ArrivalMessageProvider>,
}

// Follow-ups of a raised alarm, posted back into the session so they are processed like any other event.
#[derive(Debug)]
enum AlarmFollowUp {
    Expired { generation: u64 },
    Message { generation: u64, text: String },
}

#[derive(Debug)]
struct ActiveAlarm {
    generation: u64,
    timer: JoinHandle<()>,
    message: JoinHandle<()>,
}

/// Owns the geofence engine and the location source, and is the only writer of either.
///
/// Commands, location updates and alarm follow-ups are processed one at a time by [`Session::run`], which publishes a
/// [`SessionSnapshot`] after each of them.
#[derive(Debug)]
pub struct Session {
    engine: GeofenceEngine,
    location: LocationSource,
    sinks: Sinks,
    settings: SessionSettings,
    rx: Receiver<Command>,
    follow_up_tx: UnboundedSender<AlarmFollowUp>,
    follow_up_rx: UnboundedReceiver<AlarmFollowUp>,
    last_fix: Option<Fix>,
    location_error: Option<LocationError>,
    alarm: Option<ActiveAlarm>,
    alarm_generation: u64,
    arrival_message: Option<String>,
    notifier_tx: watch::Sender<SessionSnapshot>,
    notifier_rx: watch::Receiver<SessionSnapshot>,
}

impl Session {
    pub fn new(rx: Receiver<Command>, location: LocationSource, sinks: Sinks, settings: SessionSettings) -> Self {
        let (follow_up_tx, follow_up_rx) = mpsc::unbounded_channel();
        let (notifier_tx, notifier_rx) = watch::channel(SessionSnapshot::default());

        Session {
            engine: GeofenceEngine::new(settings.hysteresis_m),
            location,
            sinks,
            settings,
            rx,
            follow_up_tx,
            follow_up_rx,
            last_fix: None,
            location_error: None,
            alarm: None,
            alarm_generation: 0,
            arrival_message: None,
            notifier_tx,
            notifier_rx,
        }
    }

    pub fn notifier(&self) -> watch::Receiver<SessionSnapshot> {
        self.notifier_rx.clone()
    }

    /// Runs until every [`SessionHandle`](crate::session::SessionHandle) is dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        let mut location_rx = self.location.subscribe();
        self.location.start().await;
        info!("🟢 Session started");

        loop {
            tokio::select! {
                command = self.rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(follow_up) = self.follow_up_rx.recv() => self.handle_follow_up(follow_up),
                Ok(()) = location_rx.changed() => {
                    let status = location_rx.borrow_and_update().clone();
                    self.handle_location(status);
                }
            }
            self.publish();
        }

        self.location.stop().await;
        self.stop_alarm("session ended");
        self.publish();
        info!("🔴 Session ended");
    }

    fn handle_command(&mut self, command: Command) {
        debug!("🔵 Received command: {:?}", command);
        match command {
            Command::SetTarget { coordinate, radius_m, label } => {
                let event = self.engine.apply(EngineInput::SetTarget { coordinate, radius_m, label });
                self.handle_geofence_event(event);
            }
            Command::SetRadius(radius_m) => {
                let event = self.engine.apply(EngineInput::SetRadius(radius_m));
                self.handle_geofence_event(event);
            }
            Command::ClearTarget => {
                self.engine.apply(EngineInput::ClearTarget);
                self.stop_alarm("target cleared");
            }
            Command::SelectPlace { place, radius_m } => {
                let radius_m = radius_m
                    .or_else(|| self.engine.target().map(|target| target.radius_m()))
                    .unwrap_or(self.settings.default_radius_m);
                info!(radius_m, "🔎 Selected '{}'", place.label);
                let event = self.engine.apply(EngineInput::SetTarget {
                    coordinate: place.coordinate,
                    radius_m,
                    label: Some(place.label),
                });
                self.sinks.map.focus(place.coordinate);
                self.handle_geofence_event(event);
            }
            Command::Dismiss => {
                if self.alarm.is_none() {
                    debug!("🔕 Nothing to dismiss");
                }
                self.stop_alarm("dismissed");
            }
            Command::Recenter => match self.engine.position() {
                Some(coordinate) => self.sinks.map.focus(coordinate),
                None => info!("🗺️ Unable to recenter, no position yet"),
            },
        }
    }

    fn handle_location(&mut self, status: LocationStatus) {
        match status {
            LocationStatus::Idle => {}
            LocationStatus::Fix(fix) => {
                let event = self.engine.apply(EngineInput::PositionUpdated(fix.coordinate));
                self.last_fix = Some(fix);
                self.location_error = None;
                self.handle_geofence_event(event);
            }
            LocationStatus::Failed(location_error) => {
                error!("📡 Location tracking stopped: {}", location_error);
                self.location_error = Some(location_error);
            }
        }
    }

    fn handle_follow_up(&mut self, follow_up: AlarmFollowUp) {
        let current = self.alarm.as_ref().map(|alarm| alarm.generation);
        match follow_up {
            AlarmFollowUp::Expired { generation } if current == Some(generation) => self.stop_alarm("auto-stop"),
            AlarmFollowUp::Message { generation, text } if current == Some(generation) => {
                self.sinks.alarm.show_message(&text);
                self.arrival_message = Some(text);
            }
            stale => debug!("🔔 Ignoring follow-up of a previous alarm: {:?}", stale),
        }
    }

    fn handle_geofence_event(&mut self, event: Option<GeofenceEvent>) {
        match event {
            Some(GeofenceEvent::Arrived { distance_m }) => self.raise_alarm(distance_m),
            Some(GeofenceEvent::Rearmed { distance_m }) => debug!(distance_m, "🔁 Ready for the next arrival"),
            None => {}
        }
    }

    fn raise_alarm(&mut self, distance_m: f64) {
        let Some(target) = self.engine.target() else {
            return;
        };

        let arrival = Arrival {
            label: target.label().map(str::to_string),
            coordinate: target.coordinate(),
            distance_m,
            radius_m: target.radius_m(),
        };

        self.stop_alarm("superseded");
        self.alarm_generation += 1;
        let generation = self.alarm_generation;

        // Raise first, the message must never hold up the alarm
        self.sinks.alarm.raise();
        info!(generation, "🔔 Alarm raised");

        let tx = self.follow_up_tx.clone();
        let duration = self.settings.alarm_duration;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            tx.send(AlarmFollowUp::Expired { generation }).unwrap_or_default();
        });

        let tx = self.follow_up_tx.clone();
        let provider = self.sinks.messages.clone();
        let limit = self.settings.message_timeout;
        let fallback = self.settings.fallback_message.clone();
        let message = tokio::spawn(async move {
            let text = message_or_fallback(provider.as_ref(), &arrival, limit, &fallback).await;
            tx.send(AlarmFollowUp::Message { generation, text }).unwrap_or_default();
        });

        self.alarm = Some(ActiveAlarm { generation, timer, message });
    }

    // Silencing never touches the arm state, only leaving the hysteresis band re-arms the geofence.
    fn stop_alarm(&mut self, reason: &str) {
        let Some(alarm) = self.alarm.take() else {
            return;
        };

        alarm.timer.abort();
        alarm.message.abort();
        self.arrival_message = None;
        self.sinks.alarm.silence();
        info!(generation = alarm.generation, "🔕 Alarm stopped, {}", reason);
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tracking: self.engine.tracking_state(),
            position: self.last_fix.clone(),
            target: self.engine.target().cloned(),
            arm: self.engine.arm_state(),
            distance_m: self.engine.distance_m(),
            alarm_active: self.alarm.is_some(),
            arrival_message: self.arrival_message.clone(),
            location_error: self.location_error,
        }
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.notifier_tx.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}
