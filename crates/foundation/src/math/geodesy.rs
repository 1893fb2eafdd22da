use super::Coordinate;

/// Mean Earth radius (meters) for the spherical model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Below this `|cos(lat)|` a longitude offset is treated as zero.
const POLE_COS_EPSILON: f64 = 1e-6;

/// Great-circle distance in meters using the haversine formula.
///
/// Returns NaN if either position has a non-finite latitude or longitude;
/// callers check `is_finite` on the result.
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return f64::NAN;
    }

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lon = (d_lon / 2.0).sin();

    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

pub fn meters_to_latitude_degrees(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}

/// Longitude span (degrees) covered by `meters` along the parallel at `at_latitude`.
///
/// Within ~0.00006° of a pole this returns 0.
pub fn meters_to_longitude_degrees(meters: f64, at_latitude: f64) -> f64 {
    let denominator = at_latitude.to_radians().cos();
    if denominator.abs() < POLE_COS_EPSILON {
        return 0.0;
    }
    (meters / (EARTH_RADIUS_M * denominator)).to_degrees()
}

pub fn clamp_latitude(value: f64) -> f64 {
    value.clamp(-90.0, 90.0)
}

/// Wraps a longitude into (-180, 180]. Non-finite values pass through.
pub fn normalize_longitude(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let mut normalized = value;
    while normalized > 180.0 {
        normalized -= 360.0;
    }
    while normalized <= -180.0 {
        normalized += 360.0;
    }
    normalized
}
