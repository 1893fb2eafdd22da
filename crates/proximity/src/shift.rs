use std::borrow::Cow;

use foundation::math::{
    COORDINATE_EPSILON_DEG, Coordinate, clamp_latitude, meters_to_latitude_degrees,
    meters_to_longitude_degrees, normalize_longitude,
};
use serde::{Deserialize, Serialize};

use crate::error::ProximityError;

/// Default simulated step, roughly two miles.
pub const DEFAULT_STEP_METERS: f64 = 3218.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = ProximityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ProximityError::UnknownDirection(s.to_string()))
    }
}

/// Moves `source` `step_meters` towards `direction`.
///
/// Latitude is clamped at the poles and longitude wrapped into (-180, 180].
/// When the move changes neither axis by more than 1e-9 degrees the
/// source is handed back borrowed. Accuracy is carried over unchanged.
///
/// Returns `None` for a non-finite source position or step.
pub fn shift<'a>(
    source: &'a Coordinate,
    direction: Direction,
    step_meters: f64,
) -> Option<Cow<'a, Coordinate>> {
    if !source.is_finite() || !step_meters.is_finite() {
        return None;
    }

    let lat_offset = meters_to_latitude_degrees(step_meters);
    let lon_offset = meters_to_longitude_degrees(step_meters, source.latitude);

    let (mut latitude, mut longitude) = (source.latitude, source.longitude);
    match direction {
        Direction::North => latitude += lat_offset,
        Direction::South => latitude -= lat_offset,
        Direction::East => longitude += lon_offset,
        Direction::West => longitude -= lon_offset,
    }

    let latitude = clamp_latitude(latitude);
    let longitude = normalize_longitude(longitude);

    if (latitude - source.latitude).abs() < COORDINATE_EPSILON_DEG
        && (longitude - source.longitude).abs() < COORDINATE_EPSILON_DEG
    {
        return Some(Cow::Borrowed(source));
    }

    Some(Cow::Owned(Coordinate {
        latitude,
        longitude,
        accuracy: source.accuracy,
    }))
}

/// String-direction entry point; unknown directions yield `None`.
pub fn shift_named<'a>(
    source: Option<&'a Coordinate>,
    direction: &str,
    step_meters: f64,
) -> Option<Cow<'a, Coordinate>> {
    let direction = direction.parse::<Direction>().ok()?;
    shift(source?, direction, step_meters)
}
