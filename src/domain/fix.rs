use crate::domain::Coordinate;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixAccuracyTier {
    High,
    Low,
}

impl Display for FixAccuracyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixAccuracyTier::High => write!(f, "high"),
            FixAccuracyTier::Low => write!(f, "low"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fix {
    pub coordinate: Coordinate,
    pub accuracy_m: Option<f64>, // Reported by the platform, informational only
    pub tier: FixAccuracyTier,
    pub timestamp: DateTime<Utc>,
}
