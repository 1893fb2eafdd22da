//! Distance unit conversions and human-readable labels.

pub const METERS_PER_MILE: f64 = 1609.34;

pub fn meters_to_miles(meters: f64) -> Option<f64> {
    meters.is_finite().then(|| meters / METERS_PER_MILE)
}

/// Miles with a fixed number of decimals, e.g. `"2.0"`. Ties round up.
pub fn format_distance_miles(meters: f64, decimals: usize) -> Option<String> {
    let miles = meters_to_miles(meters)?;
    let scale = 10f64.powi(decimals as i32);
    let rounded = round_half_up(miles * scale) / scale;
    Some(format!("{rounded:.decimals$}"))
}

// One decimal kilometre, ties up: 1250 m -> 1.3.
fn tenths_of_km(meters: f64) -> f64 {
    round_half_up(meters / 100.0) / 10.0
}

/// Label used in geofence messages: `"2.2 km"` from 1 km up, `"850 m"` below.
pub fn format_fence_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", tenths_of_km(meters))
    } else {
        format!("{} m", round_half_up(meters))
    }
}

/// General-purpose label: whole kilometres from 10 km, one decimal from 1 km,
/// rounded meters below.
pub fn format_distance_label(meters: f64) -> Option<String> {
    if !meters.is_finite() {
        return None;
    }
    let label = if meters >= 10_000.0 {
        format!("{} km", round_half_up(meters / 1000.0))
    } else if meters >= 1000.0 {
        format!("{:.1} km", tenths_of_km(meters))
    } else {
        format!("{} m", round_half_up(meters))
    };
    Some(label)
}

// Half-way values round towards +inf, so 2.5 -> 3 and -2.5 -> -2.
fn round_half_up(value: f64) -> f64 {
    let rounded = (value + 0.5).floor();
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::{
        format_distance_label, format_distance_miles, format_fence_distance, meters_to_miles,
    };

    #[test]
    fn fence_distance_switches_to_km_at_one_kilometre() {
        assert_eq!(format_fence_distance(999.4), "999 m");
        assert_eq!(format_fence_distance(1000.0), "1.0 km");
        assert_eq!(format_fence_distance(2226.4), "2.2 km");
        assert_eq!(format_fence_distance(40_000.0), "40.0 km");
        assert_eq!(format_fence_distance(12.5), "13 m");
    }

    #[test]
    fn half_way_kilometres_round_up() {
        assert_eq!(format_fence_distance(1250.0), "1.3 km");
        assert_eq!(format_fence_distance(2250.0), "2.3 km");
        assert_eq!(format_fence_distance(3250.0), "3.3 km");
        assert_eq!(format_distance_label(2250.0).as_deref(), Some("2.3 km"));
        assert_eq!(format_distance_label(12_500.0).as_deref(), Some("13 km"));
    }

    #[test]
    fn distance_label_drops_decimals_past_ten_km() {
        assert_eq!(format_distance_label(12_345.0).as_deref(), Some("12 km"));
        assert_eq!(format_distance_label(3218.0).as_deref(), Some("3.2 km"));
        assert_eq!(format_distance_label(0.2).as_deref(), Some("0 m"));
        assert_eq!(format_distance_label(f64::INFINITY), None);
    }

    #[test]
    fn miles_use_fixed_decimals() {
        assert_eq!(format_distance_miles(3218.0, 1).as_deref(), Some("2.0"));
        assert_eq!(format_distance_miles(1609.34 * 0.25, 1).as_deref(), Some("0.3"));
        assert_eq!(format_distance_miles(0.0, 2).as_deref(), Some("0.00"));
        assert_eq!(meters_to_miles(f64::NAN), None);
    }
}
