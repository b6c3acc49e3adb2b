use crate::domain::{Coordinate, Place};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetTarget {
        coordinate: Coordinate,
        radius_m: f64,
        label: Option<String>,
    },
    SetRadius(f64),
    ClearTarget,
    SelectPlace {
        place: Place,
        radius_m: Option<f64>,
    },
    Dismiss,
    Recenter,
}
