//! Unit conversions, the API is all SI and people want feet and knots.
//!

/// Convert meters into feet
///
#[inline]
pub fn to_feet(a: f64) -> f64 {
    a * 3.28084
}

/// Convert m/s into knots
///
#[inline]
pub fn to_knots(a: f64) -> f64 {
    a * 1.943_844
}

/// Convert m/s into km/h
///
#[inline]
pub fn to_kmh(a: f64) -> f64 {
    a * 3.6
}

/// Convert m/s into ft/min
///
#[inline]
pub fn to_fpm(a: f64) -> f64 {
    to_feet(a) * 60.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(900., to_kmh(250.));
        assert!((to_knots(250.) - 485.961).abs() < 1e-3);
        assert!((to_feet(10_000.) - 32_808.4).abs() < 1e-6);
        assert!((to_fpm(5.08) - 1000.).abs() < 0.01);
    }
}
