use serde::{Deserialize, Serialize};

use super::precision::approx_eq;

/// Tolerance (degrees) under which two positions are considered identical.
pub const COORDINATE_EPSILON_DEG: f64 = 1e-9;
/// Tolerance (meters) under which two accuracy radii are considered identical.
pub const ACCURACY_EPSILON_M: f64 = 1e-6;

/// Geographic position in degrees, with an optional horizontal accuracy in meters.
///
/// `new` does no validation; values arriving from outside the process should go
/// through [`Coordinate::try_new`] or [`Coordinate::from_lon_lat`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
    Accuracy,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
            Axis::Accuracy => write!(f, "accuracy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateError {
    NonFinite { axis: Axis },
    OutOfRange { axis: Axis, value: f64 },
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateError::NonFinite { axis } => write!(f, "{axis} must be a finite number"),
            CoordinateError::OutOfRange { axis, value } => {
                write!(f, "{axis} {value} is out of range")
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Validated constructor.
    ///
    /// Latitude must lie in [-90, 90], longitude in [-180, 180], and accuracy
    /// (when given) must be a non-negative number of meters.
    pub fn try_new(
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
    ) -> Result<Self, CoordinateError> {
        check_axis(Axis::Latitude, latitude, -90.0, 90.0)?;
        check_axis(Axis::Longitude, longitude, -180.0, 180.0)?;
        if let Some(acc) = accuracy {
            check_axis(Axis::Accuracy, acc, 0.0, f64::MAX)?;
        }
        Ok(Self {
            latitude,
            longitude,
            accuracy,
        })
    }

    /// Builds a coordinate from a GeoJSON position (`[longitude, latitude]`).
    pub fn from_lon_lat(position: [f64; 2]) -> Result<Self, CoordinateError> {
        let [longitude, latitude] = position;
        Self::try_new(latitude, longitude, None)
    }

    /// GeoJSON position order.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// True when both latitude and longitude are finite.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

fn check_axis(axis: Axis, value: f64, min: f64, max: f64) -> Result<(), CoordinateError> {
    if !value.is_finite() {
        return Err(CoordinateError::NonFinite { axis });
    }
    if value < min || value > max {
        return Err(CoordinateError::OutOfRange { axis, value });
    }
    Ok(())
}

/// Position equality used to suppress redundant location updates.
///
/// Accuracy must either be absent on both sides or agree within
/// [`ACCURACY_EPSILON_M`].
pub fn coordinates_equal(left: &Coordinate, right: &Coordinate) -> bool {
    let lat_equal = approx_eq(left.latitude, right.latitude, COORDINATE_EPSILON_DEG);
    let lon_equal = approx_eq(left.longitude, right.longitude, COORDINATE_EPSILON_DEG);
    let accuracy_equal = match (left.accuracy, right.accuracy) {
        (None, None) => true,
        (l, r) => approx_eq(l.unwrap_or(0.0), r.unwrap_or(0.0), ACCURACY_EPSILON_M),
    };
    lat_equal && lon_equal && accuracy_equal
}

#[cfg(test)]
mod tests {
    use super::{Axis, Coordinate, CoordinateError, coordinates_equal};

    #[test]
    fn try_new_rejects_non_finite_latitude() {
        let err = Coordinate::try_new(f64::NAN, 0.0, None).unwrap_err();
        assert_eq!(
            err,
            CoordinateError::NonFinite {
                axis: Axis::Latitude
            }
        );
    }

    #[test]
    fn try_new_rejects_out_of_range_longitude() {
        let err = Coordinate::try_new(10.0, 181.0, None).unwrap_err();
        assert_eq!(
            err,
            CoordinateError::OutOfRange {
                axis: Axis::Longitude,
                value: 181.0
            }
        );
        assert_eq!(err.to_string(), "longitude 181 is out of range");
    }

    #[test]
    fn try_new_rejects_negative_accuracy() {
        assert!(Coordinate::try_new(0.0, 0.0, Some(-1.0)).is_err());
        assert!(Coordinate::try_new(0.0, 0.0, Some(12.0)).is_ok());
    }

    #[test]
    fn from_lon_lat_swaps_axes() {
        let c = Coordinate::from_lon_lat([-118.193739, 33.77005]).unwrap();
        assert_eq!(c.latitude, 33.77005);
        assert_eq!(c.longitude, -118.193739);
        assert_eq!(c.to_lon_lat(), [-118.193739, 33.77005]);
    }

    #[test]
    fn equality_tolerates_tiny_drift_but_not_accuracy_mismatch() {
        let a = Coordinate::new(33.0, -118.0);
        let b = Coordinate::new(33.0 + 1e-12, -118.0);
        assert!(coordinates_equal(&a, &b));

        let c = a.with_accuracy(10.0);
        assert!(!coordinates_equal(&a, &c));
        assert!(coordinates_equal(&c, &b.with_accuracy(10.0)));

        let nan = Coordinate::new(f64::NAN, -118.0);
        assert!(!coordinates_equal(&nan, &nan));
    }

    #[test]
    fn accuracy_is_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&Coordinate::new(1.5, 2.5)).unwrap();
        assert_eq!(json, r#"{"latitude":1.5,"longitude":2.5}"#);
    }
}
