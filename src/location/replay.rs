use crate::domain::{Coordinate, FixAccuracyTier, LocationError};
use crate::location::platform::{LocationPlatform, PlatformError, Reading, WatchOptions};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use serde::Deserialize;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ReplayedError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum StepReading {
    Fix {
        latitude: f64,
        longitude: f64,
        #[serde(default, rename = "accuracyM")]
        accuracy_m: Option<f64>,
    },
    Error {
        error: ReplayedError,
    },
}

/// One step of a recorded track: wait `delay`, then emit a fix or an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackStep {
    #[serde(default, with = "humantime_serde")]
    delay: Duration,
    // Restricts the step to watches of this tier, emitted by both when absent
    #[serde(default)]
    tier: Option<FixAccuracyTier>,
    #[serde(flatten)]
    reading: StepReading,
}

impl TrackStep {
    fn applies_to(&self, tier: FixAccuracyTier) -> bool {
        self.tier.is_none_or(|step_tier| step_tier == tier)
    }

    fn reading(&self) -> Reading {
        match self.reading {
            StepReading::Fix {
                latitude,
                longitude,
                accuracy_m,
            } => Reading::Fix {
                coordinate: Coordinate::new(latitude, longitude),
                accuracy_m,
            },
            StepReading::Error { error } => Reading::Error(match error {
                ReplayedError::PermissionDenied => PlatformError::PermissionDenied,
                ReplayedError::PositionUnavailable => PlatformError::PositionUnavailable,
                ReplayedError::Timeout => PlatformError::Timeout,
            }),
        }
    }
}

/// Replays a recorded track as if it came from the device.
///
/// Once the track is exhausted the watch stays open without producing anything, like a device that stands still.
#[derive(Debug, Clone)]
pub struct ReplayPlatform {
    steps: Arc<Vec<TrackStep>>,
}

impl ReplayPlatform {
    pub fn new(steps: Vec<TrackStep>) -> Self {
        ReplayPlatform { steps: Arc::new(steps) }
    }

    #[instrument]
    pub async fn load(path: &str) -> Result<Self, ReplayError> {
        info!("🛰️ Loading track...");
        let content = fs::read_to_string(path).await.map_err(|source| ReplayError::Io {
            source,
            path: path.to_string(),
        })?;
        let steps = serde_json::from_str::<Vec<TrackStep>>(&content).map_err(|source| ReplayError::Json {
            source,
            path: path.to_string(),
        })?;

        info!("🛰️ Loading track... OK, {} steps", steps.len());
        Ok(ReplayPlatform::new(steps))
    }
}

impl LocationPlatform for ReplayPlatform {
    fn watch_position(&self, options: WatchOptions) -> Result<BoxStream<'static, Reading>, LocationError> {
        let tier = if options.high_accuracy { FixAccuracyTier::High } else { FixAccuracyTier::Low };
        let steps: Vec<TrackStep> = self.steps.iter().filter(|step| step.applies_to(tier)).cloned().collect();

        let readings = stream::iter(steps)
            .then(|step| async move {
                tokio::time::sleep(step.delay).await;
                step.reading()
            })
            .chain(stream::pending());

        Ok(readings.boxed())
    }
}

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("unable to read track '{path}': {source}")]
    Io { source: io::Error, path: String },
    #[error("invalid track '{path}': {source}")]
    Json { source: serde_json::Error, path: String },
}
