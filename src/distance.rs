use crate::domain::Coordinate;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two coordinates, using the haversine formula.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let sin_dlat = (delta_lat / 2.0).sin();
    let sin_dlon = (delta_lon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat_a.cos() * lat_b.cos() * sin_dlon * sin_dlon;

    // Rounding can push h slightly above 1 for antipodal points
    2.0 * EARTH_RADIUS_M * h.min(1.0).sqrt().asin()
}
