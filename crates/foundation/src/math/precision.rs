//! Float comparison policies.
//!
//! Scores and distances can be infinite (unknown distance) or NaN (failed
//! computation), so anything that ranks them goes through a total order.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// `-0.0` becomes `0.0` and every NaN payload collapses to one NaN.
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats. NaN sorts after `+inf`.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Absolute-tolerance equality. Never true when either side is NaN.
#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

#[cfg(test)]
mod tests {
    use super::{approx_eq, canonical_f64, stable_total_cmp_f64};
    use core::cmp::Ordering;

    #[test]
    fn canonicalizes_negative_zero() {
        assert_eq!(canonical_f64(-0.0).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn infinity_and_nan_order_last() {
        assert_eq!(stable_total_cmp_f64(1.0e12, f64::INFINITY), Ordering::Less);
        assert_eq!(
            stable_total_cmp_f64(f64::INFINITY, f64::INFINITY),
            Ordering::Equal
        );
        assert_eq!(stable_total_cmp_f64(f64::INFINITY, f64::NAN), Ordering::Less);
        assert_eq!(stable_total_cmp_f64(-0.0, 0.0), Ordering::Equal);
    }

    #[test]
    fn approx_eq_rejects_nan() {
        assert!(approx_eq(1.0, 1.0 + 1e-12, 1e-9));
        assert!(!approx_eq(f64::NAN, f64::NAN, 1.0));
    }
}
