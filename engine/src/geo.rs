//! Spherical-earth helpers.
//!
//! Everything here uses a spherical earth of radius 6371 km, which is plenty for the short
//! extrapolation windows we have between two polls.
//!

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Mean earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.;

/// A point on the map, in degrees.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Position { lat, lon }
    }

    /// Clamp latitude to ±90° and wrap longitude into [-180°, 180°).
    ///
    pub fn normalized(&self) -> Self {
        let lat = self.lat.clamp(-90., 90.);
        let lon = (self.lon + 180.).rem_euclid(360.) - 180.;
        Position { lat, lon }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// Project `from` along `bearing` (degrees from true north) for `dist` km on a great circle.
///
/// The result is not normalised, see [`Position::normalized`].
///
pub fn destination(from: Position, bearing: f64, dist: f64) -> Position {
    let lat = from.lat.to_radians();
    let lon = from.lon.to_radians();
    let bearing = bearing.to_radians();
    let delta = dist / EARTH_RADIUS_KM;

    let new_lat = (lat.sin() * delta.cos() + lat.cos() * delta.sin() * bearing.cos()).asin();
    let new_lon = lon
        + (bearing.sin() * delta.sin() * lat.cos()).atan2(delta.cos() - lat.sin() * new_lat.sin());

    Position {
        lat: new_lat.to_degrees(),
        lon: new_lon.to_degrees(),
    }
}

/// Great-circle distance in km between two points.
///
pub fn haversine_km(a: Position, b: Position) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.).sin().powi(2);

    2. * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[inline]
    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_destination_one_degree_north() {
        // One degree of latitude is R * π / 180 km
        let d = EARTH_RADIUS_KM * std::f64::consts::PI / 180.;
        let p = destination(Position::new(0., 0.), 0., d);
        assert!(close(1., p.lat, 1e-9), "{p}");
        assert!(close(0., p.lon, 1e-9), "{p}");
    }

    #[test]
    fn test_destination_east() {
        let p = destination(Position::new(40., -74.), 90., 900.);
        assert!(close(39.52275, p.lat, 1e-4), "{p}");
        assert!(close(-63.48305, p.lon, 1e-4), "{p}");
    }

    #[test]
    fn test_destination_zero() {
        let from = Position::new(50.9, 4.48);
        let p = destination(from, 123., 0.);
        assert!(close(from.lat, p.lat, 1e-12));
        assert!(close(from.lon, p.lon, 1e-12));
    }

    #[rstest]
    #[case(Position::new(40., -74.), Position::new(39.52275259134007, -63.48305053089134), 900.)]
    #[case(Position::new(50.9, 4.48), Position::new(51.47, -0.45), 349.3359)]
    #[case(Position::new(10., 20.), Position::new(10., 20.), 0.)]
    fn test_haversine(#[case] a: Position, #[case] b: Position, #[case] d: f64) {
        assert!(close(d, haversine_km(a, b), 1e-3));
        assert!(close(haversine_km(a, b), haversine_km(b, a), 1e-9));
    }

    #[rstest]
    #[case(Position::new(0., 180.8), Position::new(0., -179.2))]
    #[case(Position::new(0., -180.5), Position::new(0., 179.5))]
    #[case(Position::new(91., 10.), Position::new(90., 10.))]
    #[case(Position::new(-95., 370.), Position::new(-90., 10.))]
    #[case(Position::new(12., 34.), Position::new(12., 34.))]
    fn test_normalized(#[case] input: Position, #[case] want: Position) {
        let got = input.normalized();
        assert!(close(want.lat, got.lat, 1e-9), "{got}");
        assert!(close(want.lon, got.lon, 1e-9), "{got}");
    }
}
