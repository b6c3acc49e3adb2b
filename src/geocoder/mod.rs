mod nominatim;

pub use nominatim::NominatimGeocoder;

use crate::domain::Place;
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

/// Free-text destination search. Candidates are returned best match first.
#[async_trait]
pub trait Geocoder: Debug + Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;
}

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("no results for '{0}'")]
    NoResults(String),
}
