use crate::domain::Coordinate;
use chrono::{DateTime, Utc};

/// The destination the geofence is drawn around. Replaced wholesale whenever a new destination is chosen.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    coordinate: Coordinate,
    radius_m: f64,
    label: Option<String>,
    created_at: DateTime<Utc>,
}

impl Target {
    pub fn new(coordinate: Coordinate, radius_m: f64, label: Option<String>) -> Self {
        Target {
            coordinate,
            radius_m,
            label,
            created_at: Utc::now(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub(crate) fn set_radius_m(&mut self, radius_m: f64) {
        self.radius_m = radius_m;
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
