use crate::messages::provider::{Arrival, ArrivalMessageProvider, MessageError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArrivalMessageRequest<'a> {
    destination: Option<&'a str>,
    latitude: f64,
    longitude: f64,
    distance_m: f64,
    radius_m: f64,
}

#[derive(Debug, Deserialize)]
struct ArrivalMessageResponse {
    text: String,
}

/// Fetches arrival messages from a text generation service that answers `{ "text": "..." }`.
#[derive(Debug)]
pub struct HttpArrivalMessageProvider {
    client: Client,
    url: String,
}

impl HttpArrivalMessageProvider {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        HttpArrivalMessageProvider { client, url: url.into() }
    }
}

#[async_trait]
impl ArrivalMessageProvider for HttpArrivalMessageProvider {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn arrival_message(&self, arrival: &Arrival) -> Result<String, MessageError> {
        debug!("💬 Requesting arrival message...");
        let request = ArrivalMessageRequest {
            destination: arrival.label.as_deref(),
            latitude: arrival.coordinate.latitude,
            longitude: arrival.coordinate.longitude,
            distance_m: arrival.distance_m,
            radius_m: arrival.radius_m,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ArrivalMessageResponse>()
            .await?;

        if response.text.trim().is_empty() {
            return Err(MessageError::Empty);
        }

        debug!("💬 Requesting arrival message... OK");
        Ok(response.text)
    }
}
