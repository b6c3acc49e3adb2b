use crate::domain::{Fix, FixAccuracyTier, LocationError};
use crate::location::platform::{LocationPlatform, Reading, WatchOptions};
use chrono::Utc;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LocationStatus {
    #[default]
    Idle,
    Fix(Fix),
    Failed(LocationError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierOptions {
    pub high: WatchOptions,
    pub low: WatchOptions,
}

impl TierOptions {
    fn for_tier(&self, tier: FixAccuracyTier) -> WatchOptions {
        match tier {
            FixAccuracyTier::High => self.high,
            FixAccuracyTier::Low => self.low,
        }
    }
}

/// Continuous position observation with a high to low accuracy fallback.
///
/// Only the latest status is kept: consumers subscribe to a watch channel and never see a backlog of stale fixes.
#[derive(Debug)]
pub struct LocationSource {
    platform: Arc<dyn LocationPlatform>,
    tiers: TierOptions,
    status_tx: Arc<watch::Sender<LocationStatus>>,
    task: Option<JoinHandle<()>>,
}

impl LocationSource {
    pub fn new(platform: Arc<dyn LocationPlatform>, tiers: TierOptions) -> Self {
        let (status_tx, _) = watch::channel(LocationStatus::Idle);

        LocationSource {
            platform,
            tiers,
            status_tx: Arc::new(status_tx),
            task: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LocationStatus> {
        self.status_tx.subscribe()
    }

    /// Starts observing. A running observation is released before the new platform watch is requested.
    pub async fn start(&mut self) {
        self.stop().await;

        let platform = self.platform.clone();
        let tiers = self.tiers;
        let status_tx = self.status_tx.clone();
        self.task = Some(tokio::spawn(async move {
            observe(platform.as_ref(), tiers, &status_tx).await;
        }));
    }

    /// Releases the platform watch. Returns once the observation task, and the watch it holds, is gone.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            match task.await {
                Err(e) if !e.is_cancelled() => error!("📡 Observation task failed: {}", e),
                _ => {}
            }
            info!("📡 Stopped watching position");
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

// Dropping cannot wait for the task, the watch is released once the runtime cancels it.
impl Drop for LocationSource {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Tier to continue with after `error` ended the observation at `tier`, if any.
fn fallback_tier(tier: FixAccuracyTier, error: LocationError) -> Option<FixAccuracyTier> {
    match (tier, error) {
        (FixAccuracyTier::High, LocationError::Timeout | LocationError::PositionUnavailable) => Some(FixAccuracyTier::Low),
        _ => None,
    }
}

#[instrument(skip_all)]
async fn observe(platform: &dyn LocationPlatform, tiers: TierOptions, status_tx: &watch::Sender<LocationStatus>) {
    let mut tier = FixAccuracyTier::High;
    loop {
        let error = observe_tier(platform, tier, tiers.for_tier(tier), status_tx).await;

        match fallback_tier(tier, error) {
            Some(next) => {
                warn!(tier = %tier, "📡 Watching position... failed, {}. Falling back to {} accuracy", error, next);
                tier = next;
            }
            None => {
                error!(tier = %tier, "📡 Watching position... failed, {}", error);
                status_tx.send_replace(LocationStatus::Failed(error));
                return;
            }
        }
    }
}

/// Observes a single tier until it fails. The platform watch is released when this returns.
async fn observe_tier(platform: &dyn LocationPlatform, tier: FixAccuracyTier, options: WatchOptions, status_tx: &watch::Sender<LocationStatus>) -> LocationError {
    info!(tier = %tier, timeout = ?options.timeout, max_fix_age = ?options.max_fix_age, "📡 Watching position...");
    let mut readings = match platform.watch_position(options) {
        Ok(readings) => readings,
        Err(error) => return error,
    };

    let mut acquired = false;
    loop {
        let reading = if acquired {
            readings.next().await
        } else {
            match timeout(options.timeout, readings.next()).await {
                Ok(reading) => reading,
                Err(_) => return LocationError::Timeout,
            }
        };

        match reading {
            Some(Reading::Fix { coordinate, accuracy_m }) => {
                if !acquired {
                    info!(tier = %tier, "📡 Watching position... OK");
                    acquired = true;
                }
                debug!(tier = %tier, accuracy_m, "📍 Fix at {}, {}", coordinate.latitude, coordinate.longitude);
                status_tx.send_replace(LocationStatus::Fix(Fix {
                    coordinate,
                    accuracy_m,
                    tier,
                    timestamp: Utc::now(),
                }));
            }
            Some(Reading::Error(error)) => return error.into(),
            None => return LocationError::PositionUnavailable,
        }
    }
}
