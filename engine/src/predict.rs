//! Dead-reckoning of aircraft positions between two polls.
//!
//! We assume constant ground speed and true track since the last authoritative position and
//! project along the great circle.  Aircraft on the ground, or for which we lack either speed or
//! track, stay where they were last seen.
//!
//! The result is the raw projection: no clamping of latitude, no wrapping of longitude.  Callers
//! that display it are expected to cap the elapsed time and call
//! [`Position::normalized`](crate::Position::normalized).
//!

use tracing::trace;

use flightwatch_formats::to_kmh;

use crate::{destination, Position};

/// Milliseconds in one hour
const MS_PER_HOUR: f64 = 3_600_000.;

/// Estimate where the aircraft is `elapsed_ms` after being seen at `actual`.
///
/// - `velocity` is the ground speed in m/s
/// - `heading` is the true track in degrees
///
#[tracing::instrument(level = "trace")]
pub fn predict(
    actual: Position,
    velocity: Option<f64>,
    heading: Option<f64>,
    on_ground: bool,
    elapsed_ms: f64,
) -> Position {
    let (velocity, heading) = match (velocity, heading) {
        (Some(v), Some(h)) if !on_ground => (v, h),
        _ => return actual,
    };

    let dist = to_kmh(velocity) * (elapsed_ms / MS_PER_HOUR);
    trace!("{dist} km along {heading}°");

    // Avoid asin(sin(x)) rounding when nothing moved
    if dist == 0. {
        return actual;
    }
    destination(actual, heading, dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine_km;

    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_predict_one_hour_east() {
        let from = Position::new(40., -74.);
        let p = predict(from, Some(250.), Some(90.), false, 3_600_000.);

        assert!(p.lon > from.lon);
        assert!((p.lat - 40.).abs() < 0.5, "{p}");
        assert!((haversine_km(from, p) - 900.).abs() < 1e-6);
    }

    #[rstest]
    #[case(None, Some(90.), false)]
    #[case(Some(250.), None, false)]
    #[case(None, None, false)]
    #[case(Some(250.), Some(90.), true)]
    fn test_predict_no_extrapolation(
        #[case] velocity: Option<f64>,
        #[case] heading: Option<f64>,
        #[case] on_ground: bool,
    ) {
        let from = Position::new(10., 20.);
        assert_eq!(from, predict(from, velocity, heading, on_ground, 60_000.));
    }

    #[test]
    fn test_predict_nan_propagates() {
        let p = predict(Position::new(10., 20.), Some(f64::NAN), Some(0.), false, 1000.);
        assert!(p.lat.is_nan());
    }

    proptest! {
        #[test]
        fn prop_ground_is_identity(
            lat in -80f64..80., lon in -179f64..179.,
            v in 0f64..400., h in 0f64..360., t in 0f64..3_600_000.
        ) {
            let from = Position::new(lat, lon);
            prop_assert_eq!(from, predict(from, Some(v), Some(h), true, t));
        }

        #[test]
        fn prop_zero_elapsed_is_identity(
            lat in -80f64..80., lon in -179f64..179.,
            v in 0f64..400., h in 0f64..360.
        ) {
            let from = Position::new(lat, lon);
            prop_assert_eq!(from, predict(from, Some(v), Some(h), false, 0.));
        }

        #[test]
        fn prop_displacement_grows_with_time(
            lat in -70f64..70., lon in -170f64..170.,
            v in 50f64..300., h in 0f64..360.,
            t1 in 1_000f64..30_000., dt in 1_000f64..30_000.
        ) {
            let from = Position::new(lat, lon);
            let p1 = predict(from, Some(v), Some(h), false, t1);
            let p2 = predict(from, Some(v), Some(h), false, t1 + dt);
            prop_assert_ne!(p1, p2);
            prop_assert!(haversine_km(from, p2) > haversine_km(from, p1));
        }

        #[test]
        fn prop_distance_matches_speed(
            lat in -70f64..70., lon in -170f64..170.,
            v in 50f64..300., h in 0f64..360., t in 1_000f64..120_000.
        ) {
            let from = Position::new(lat, lon);
            let p = predict(from, Some(v), Some(h), false, t);
            let want = v * 3.6 * t / 3_600_000.;
            prop_assert!((haversine_km(from, p) - want).abs() < 1e-6 * want.max(1.));
        }
    }
}
