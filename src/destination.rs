use crate::app_config::Destination;
use crate::geocoder::{GeocodeError, Geocoder};
use crate::session::{SessionError, SessionHandle};
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Error, Debug)]
pub enum DestinationError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Starts tracking the configured destination: a fixed coordinate wins over a search query.
#[instrument(skip_all)]
pub async fn track_destination(
    destination: &Destination,
    default_radius_m: f64,
    geocoder: &dyn Geocoder,
    handle: &SessionHandle,
) -> Result<(), DestinationError> {
    let radius_m = destination.radius_m().unwrap_or(default_radius_m);

    if let Some(coordinate) = destination.coordinate() {
        info!(radius_m, "🎯 Tracking configured destination {}, {}", coordinate.latitude, coordinate.longitude);
        handle.set_target(coordinate, radius_m).await?;
        return Ok(());
    }

    let Some(query) = destination.query() else {
        warn!("⚠️ Destination configured without coordinate or query, nothing to track");
        return Ok(());
    };

    let Some(place) = geocoder.search(query).await?.into_iter().next() else {
        return Err(GeocodeError::NoResults(query.to_string()).into());
    };
    info!(radius_m, "🎯 Tracking best match '{}'", place.label);
    handle.select_place(place, Some(radius_m)).await?;

    Ok(())
}
