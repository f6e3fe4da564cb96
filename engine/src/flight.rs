//! The `Flight` struct is what we track and what we hand over to whatever displays it.
//!
//! It keeps all the upstream fields plus two positions:
//! - `actual` is the last authoritative position from the API and the only anchor for prediction
//! - `display` is the position currently shown, always derived from `actual`
//!

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use flightwatch_formats::{StateList, StateVector};

use crate::{predict, Position};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Flight {
    /// ICAO 24-bit address, our unique key
    pub icao24: String,
    pub callsign: Option<String>,
    pub origin_country: String,
    /// Meters
    pub baro_altitude: Option<f64>,
    /// Meters
    pub geo_altitude: Option<f64>,
    pub on_ground: bool,
    /// Ground speed in m/s
    pub velocity: Option<f64>,
    /// True track in degrees
    pub heading: Option<f64>,
    /// m/s
    pub vertical_rate: Option<f64>,
    pub squawk: Option<String>,
    /// When the API last heard from the aircraft
    pub last_contact: DateTime<Utc>,
    /// When we received `actual`
    pub anchored_at: DateTime<Utc>,
    /// Last authoritative position
    pub actual: Position,
    /// What we show
    pub display: Position,
}

impl Flight {
    /// Build a new flight from a state vector received at `now`.  Vectors without a position are
    /// of no use to us.
    ///
    pub fn from_state(sv: &StateVector, now: DateTime<Utc>) -> Option<Self> {
        let (lat, lon) = match (sv.latitude, sv.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                trace!("{} has no position", sv.icao24);
                return None;
            }
        };
        let pos = Position::new(lat, lon);
        let last_contact = DateTime::from_timestamp(sv.last_contact, 0).unwrap_or(now);

        Some(Flight {
            icao24: sv.icao24.clone(),
            callsign: sv.callsign.clone(),
            origin_country: sv.origin_country.clone(),
            baro_altitude: sv.baro_altitude,
            geo_altitude: sv.geo_altitude,
            on_ground: sv.on_ground,
            velocity: sv.velocity,
            heading: sv.true_track,
            vertical_rate: sv.vertical_rate,
            squawk: sv.squawk.clone(),
            last_contact,
            anchored_at: now,
            actual: pos,
            display: pos,
        })
    }

    /// Where we think the aircraft is at `now`, with the elapsed time capped at `max`.
    ///
    pub fn predict_at(&self, now: DateTime<Utc>, max: Duration) -> Position {
        let elapsed = (now - self.anchored_at).clamp(Duration::zero(), max);
        let elapsed_ms = elapsed.num_milliseconds() as f64;

        predict(
            self.actual,
            self.velocity,
            self.heading,
            self.on_ground,
            elapsed_ms,
        )
    }
}

/// Convert a whole poll result into flights, skipping those without position.
///
#[tracing::instrument(skip(list))]
pub fn flights_from(list: &StateList, now: DateTime<Utc>) -> Vec<Flight> {
    list.iter()
        .filter_map(|sv| Flight::from_state(sv, now))
        .collect()
}
