use crate::app_config::AppConfig;
use crate::domain::{Coordinate, Place};
use crate::geocoder::{GeocodeError, Geocoder};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl SearchResult {
    fn into_place(self) -> Option<Place> {
        let latitude = self.lat.parse::<f64>().ok()?;
        let longitude = self.lon.parse::<f64>().ok()?;
        let coordinate = Coordinate::new(latitude, longitude);

        coordinate.is_valid().then_some(Place {
            coordinate,
            label: self.display_name,
        })
    }
}

/// Geocoder backed by the Nominatim search API.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: Client,
    url: String,
    max_results: usize,
    retry_ms: u64,
    retry_max_delay: Duration,
    max_retries: usize,
}

impl NominatimGeocoder {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        let geocoder = config.geocoder();
        NominatimGeocoder {
            client,
            url: geocoder.url().trim_end_matches('/').to_string(),
            max_results: geocoder.max_results(),
            retry_ms: geocoder.retry_ms(),
            retry_max_delay: geocoder.retry_max_delay(),
            max_retries: geocoder.max_retries(),
        }
    }

    async fn request(&self, query: &str) -> Result<Vec<SearchResult>, reqwest::Error> {
        let limit = self.max_results.to_string();
        self.client
            .get(format!("{}/search", self.url))
            .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<SearchResult>>()
            .await
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let strategy = ExponentialBackoff::from_millis(self.retry_ms)
            .factor(2)
            .max_delay(self.retry_max_delay)
            .map(jitter)
            .take(self.max_retries);

        info!("🔎 Searching for '{}'...", query);
        let results = Retry::spawn(strategy, || async {
            self.request(query).await.inspect_err(|e| {
                warn!("⚠️ Search failed: {}. Retrying...", e);
            })
        })
        .await?;

        let found = results.len();
        let places: Vec<Place> = results.into_iter().filter_map(SearchResult::into_place).collect();
        if places.len() < found {
            warn!("🔎 Skipped {} result(s) with an invalid coordinate", found - places.len());
        }

        if places.is_empty() {
            info!("🔎 Searching for '{}'... no results", query);
            return Err(GeocodeError::NoResults(query.to_string()));
        }

        info!("🔎 Searching for '{}'... OK, {} found", query, places.len());
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    fn geocoder(url: String) -> NominatimGeocoder {
        let config = AppConfigBuilder::new().geocoder_url(url).build();
        NominatimGeocoder::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn search_returns_places_in_order() -> Result<(), GeocodeError> {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Rotterdam Centraal".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(include_str!("../../tests/resources/nominatim_search_response.json"))
            .create_async()
            .await;

        let places = geocoder(server.url()).search("Rotterdam Centraal").await?;

        mock.assert_async().await;
        assert_eq!(
            places,
            vec![
                Place {
                    coordinate: Coordinate::new(51.9244424, 4.4694632),
                    label: "Rotterdam Centraal, Stationsplein, Rotterdam, Zuid-Holland, Nederland".to_string(),
                },
                Place {
                    coordinate: Coordinate::new(51.9249, 4.4690),
                    label: "Rotterdam Centraal, Weena, Rotterdam, Zuid-Holland, Nederland".to_string(),
                },
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn search_without_results_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let result = geocoder(server.url()).search("Atlantis").await;

        assert!(matches!(result, Err(GeocodeError::NoResults(query)) if query == "Atlantis"));
    }

    #[tokio::test]
    async fn search_retries_failed_requests() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let result = geocoder(server.url()).search("Rotterdam").await;

        // One attempt plus two retries
        mock.assert_async().await;
        assert!(matches!(result, Err(GeocodeError::RequestError(_))));
    }
}
