use crate::domain::Coordinate;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// What the message provider gets to know about an arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    pub label: Option<String>,
    pub coordinate: Coordinate,
    pub distance_m: f64,
    pub radius_m: f64,
}

#[async_trait]
pub trait ArrivalMessageProvider: Debug + Send + Sync {
    async fn arrival_message(&self, arrival: &Arrival) -> Result<String, MessageError>;
}

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("the provider returned an empty message")]
    Empty,
    #[error("no message provider configured")]
    NotConfigured,
}

/// Provider used when no message service is configured, every arrival gets the fallback text.
#[derive(Debug, Default)]
pub struct NoMessageProvider;

#[async_trait]
impl ArrivalMessageProvider for NoMessageProvider {
    async fn arrival_message(&self, _arrival: &Arrival) -> Result<String, MessageError> {
        Err(MessageError::NotConfigured)
    }
}

/// Asks the provider for a message, using `fallback` when it fails, is too slow or has nothing to say.
#[instrument(skip_all)]
pub async fn message_or_fallback(provider: &dyn ArrivalMessageProvider, arrival: &Arrival, limit: Duration, fallback: &str) -> String {
    match timeout(limit, provider.arrival_message(arrival)).await {
        Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(Ok(_)) => {
            warn!("💬 Arrival message was empty, using fallback");
            fallback.to_string()
        }
        Ok(Err(MessageError::NotConfigured)) => {
            debug!("💬 No message provider configured, using fallback");
            fallback.to_string()
        }
        Ok(Err(e)) => {
            warn!("💬 Unable to get an arrival message, using fallback: {}", e);
            fallback.to_string()
        }
        Err(_) => {
            warn!("💬 Arrival message took longer than {:?}, using fallback", limit);
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FALLBACK: &str = "You have arrived at your destination.";

    #[derive(Debug)]
    struct Fixed(&'static str);

    #[async_trait]
    impl ArrivalMessageProvider for Fixed {
        async fn arrival_message(&self, _arrival: &Arrival) -> Result<String, MessageError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Debug)]
    struct Slow;

    #[async_trait]
    impl ArrivalMessageProvider for Slow {
        async fn arrival_message(&self, _arrival: &Arrival) -> Result<String, MessageError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("Too late".to_string())
        }
    }

    #[derive(Debug)]
    struct Failing;

    #[async_trait]
    impl ArrivalMessageProvider for Failing {
        async fn arrival_message(&self, _arrival: &Arrival) -> Result<String, MessageError> {
            Err(MessageError::Empty)
        }
    }

    fn arrival() -> Arrival {
        Arrival {
            label: Some("Rotterdam Centraal".to_string()),
            coordinate: Coordinate::new(51.9244, 4.4695),
            distance_m: 42.0,
            radius_m: 100.0,
        }
    }

    #[tokio::test]
    async fn uses_the_provided_message() {
        let text = message_or_fallback(&Fixed("  Welcome!  "), &arrival(), Duration::from_secs(1), FALLBACK).await;

        assert_eq!(text, "Welcome!");
    }

    #[tokio::test]
    async fn falls_back_on_an_empty_message() {
        let text = message_or_fallback(&Fixed("   "), &arrival(), Duration::from_secs(1), FALLBACK).await;

        assert_eq!(text, FALLBACK);
    }

    #[tokio::test]
    async fn falls_back_on_errors() {
        let text = message_or_fallback(&Failing, &arrival(), Duration::from_secs(1), FALLBACK).await;

        assert_eq!(text, FALLBACK);
    }

    #[tokio::test]
    async fn falls_back_without_provider() {
        let text = message_or_fallback(&NoMessageProvider, &arrival(), Duration::from_secs(1), FALLBACK).await;

        assert_eq!(text, FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_when_the_provider_is_too_slow() {
        let text = message_or_fallback(&Slow, &arrival(), Duration::from_secs(5), FALLBACK).await;

        assert_eq!(text, FALLBACK);
    }
}
