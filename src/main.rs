use crate::app_config::AppConfig;
use crate::destination::track_destination;
use crate::domain::commands::Command;
use crate::geocoder::NominatimGeocoder;
use crate::location::{LocationSource, ReplayPlatform};
use crate::messages::{ArrivalMessageProvider, HttpArrivalMessageProvider, NoMessageProvider};
use crate::session::{LoggingMapView, Session, SessionHandle, SessionSettings, SessionSnapshot, Sinks, TerminalAlarm};
use crate::session_listener::session_listener;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::{signal, task};
use tracing::{error, info};

mod app_config;
mod coordinate_deserializer;
mod destination;
mod distance;
mod domain;
mod geocoder;
mod geofence;
mod http_client;
mod location;
mod messages;
mod session;
mod session_listener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    tracing_subscriber::fmt().with_max_level(config.core().log_level()).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("✅  Loaded configuration");

    let client = http_client::new_client(&config)?;
    let messages: Arc<dyn ArrivalMessageProvider> = match config.messages().url() {
        Some(url) => Arc::new(HttpArrivalMessageProvider::new(client.clone(), url)),
        None => Arc::new(NoMessageProvider),
    };

    let platform = ReplayPlatform::load(config.location().track_file()).await?;
    let location = LocationSource::new(Arc::new(platform), config.location().tier_options());

    let (tx, rx) = mpsc::channel::<Command>(config.core().command_buffer_size());
    let sinks = Sinks {
        alarm: Arc::new(TerminalAlarm),
        map: Arc::new(LoggingMapView),
        messages,
    };
    let session = Session::new(rx, location, sinks, SessionSettings::from(&config));

    run(&config, client, session, SessionHandle::new(tx)).await
}

/// Runs the session until tracking fails, the destination cannot be resolved or Ctrl-C is received. The session is
/// torn down on every one of those paths before returning.
async fn run(
    config: &AppConfig,
    client: reqwest::Client,
    session: Session,
    handle: SessionHandle,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshots = session.notifier();
    let session_task = task::spawn(session.run());
    info!("✅  Initialized session");

    let result = serve(config, client, &handle, snapshots).await;
    if let Err(e) = &result {
        error!("❌ Stopping, {}", e);
    }

    drop(handle);
    session_task.await?;
    info!("👋 Session torn down");

    result
}

async fn serve(
    config: &AppConfig,
    client: reqwest::Client,
    handle: &SessionHandle,
    snapshots: watch::Receiver<SessionSnapshot>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(destination) = config.destination() {
        let geocoder = NominatimGeocoder::new(client, config);
        track_destination(destination, config.geofence().default_radius_m(), &geocoder, handle).await?;
    }

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    tokio::select! {
        failure = session_listener(snapshots) => {
            if let Some(e) = failure {
                error!("❌ Location tracking failed: {}", e);
            }
        }
        result = signal::ctrl_c() => {
            result?;
            info!("🛑 Shutting down...");
        }
    }

    Ok(())
}
