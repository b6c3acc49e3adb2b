use crate::domain::Coordinate;
use crate::location::{TierOptions, WatchOptions};
use config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;
use tracing::Level;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    geofence: Geofence,
    alarm: Alarm,
    location: Location,
    messages: Messages,
    geocoder: Geocoder,
    destination: Option<Destination>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("ARRIVAL").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn geofence(&self) -> &Geofence {
        &self.geofence
    }

    pub fn alarm(&self) -> &Alarm {
        &self.alarm
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn geocoder(&self) -> &Geocoder {
        &self.geocoder
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    log_level: String,
    command_buffer_size: usize,
}

impl Core {
    pub fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }

    pub fn command_buffer_size(&self) -> usize {
        self.command_buffer_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Geofence {
    default_radius_m: f64,
    hysteresis_m: f64,
}

impl Geofence {
    pub fn default_radius_m(&self) -> f64 {
        self.default_radius_m
    }

    pub fn hysteresis_m(&self) -> f64 {
        self.hysteresis_m
    }
}

#[derive(Debug, Deserialize)]
pub struct Alarm {
    duration_ms: u64,
}

impl Alarm {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct Location {
    track_file: String,
    high_accuracy: AccuracyTier,
    low_accuracy: AccuracyTier,
}

impl Location {
    pub fn track_file(&self) -> &str {
        &self.track_file
    }

    pub fn tier_options(&self) -> TierOptions {
        TierOptions {
            high: self.high_accuracy.watch_options(true),
            low: self.low_accuracy.watch_options(false),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AccuracyTier {
    timeout_ms: u64,
    max_fix_age_ms: u64,
}

impl AccuracyTier {
    fn watch_options(&self, high_accuracy: bool) -> WatchOptions {
        WatchOptions {
            high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            max_fix_age: Duration::from_millis(self.max_fix_age_ms),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Messages {
    url: Option<String>,
    timeout_ms: u64,
    fallback: String,
}

impl Messages {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

#[derive(Debug, Deserialize)]
pub struct Geocoder {
    url: String,
    user_agent: String,
    request_timeout_ms: u64,
    retry_ms: u64,
    retry_max_delay_ms: u64,
    max_retries: usize,
    max_results: usize,
}

impl Geocoder {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn retry_ms(&self) -> u64 {
        self.retry_ms
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

/// Destination to track from startup, either a fixed coordinate or a free-text search.
#[derive(Debug, Deserialize)]
pub struct Destination {
    coordinate: Option<Coordinate>,
    query: Option<String>,
    radius_m: Option<f64>,
}

impl Destination {
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn radius_m(&self) -> Option<f64> {
        self.radius_m
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core {
                    log_level: "debug".to_string(),
                    command_buffer_size: 8,
                },
                geofence: Geofence {
                    default_radius_m: 100.0,
                    hysteresis_m: 50.0,
                },
                alarm: Alarm { duration_ms: 20_000 },
                location: Location {
                    track_file: "tests/resources/track.json".to_string(),
                    high_accuracy: AccuracyTier {
                        timeout_ms: 10_000,
                        max_fix_age_ms: 0,
                    },
                    low_accuracy: AccuracyTier {
                        timeout_ms: 30_000,
                        max_fix_age_ms: 60_000,
                    },
                },
                messages: Messages {
                    url: None,
                    timeout_ms: 5_000,
                    fallback: "You have arrived at your destination.".to_string(),
                },
                geocoder: Geocoder {
                    url: "https://geocoder.url".to_string(),
                    user_agent: "arrival-test".to_string(),
                    request_timeout_ms: 1_000,
                    retry_ms: 10,
                    retry_max_delay_ms: 20,
                    max_retries: 2,
                    max_results: 5,
                },
                destination: None,
            },
        }
    }

    pub fn geocoder_url(mut self, url: String) -> Self {
        self.config.geocoder.url = url;
        self
    }

    pub fn geocoder_user_agent(mut self, user_agent: &str) -> Self {
        self.config.geocoder.user_agent = user_agent.to_string();
        self
    }

    pub fn alarm_duration_ms(mut self, duration_ms: u64) -> Self {
        self.config.alarm.duration_ms = duration_ms;
        self
    }

    pub fn destination_query(mut self, query: &str) -> Self {
        self.config.destination = Some(Destination {
            coordinate: None,
            query: Some(query.to_string()),
            radius_m: None,
        });
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
