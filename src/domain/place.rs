use crate::domain::Coordinate;

/// A search candidate returned by a geocoder.
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    pub coordinate: Coordinate,
    pub label: String,
}
