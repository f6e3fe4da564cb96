//! All about `Stats`.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Counters kept by the tracker.
///
/// - `tm`: seconds since the tracker started
/// - `polls`: requests actually sent upstream
/// - `skipped`: polls stopped by the gate (in-flight, too soon, rate-limited)
/// - `flights`: state vectors received
/// - `ticks`: prediction ticks that moved something
/// - `limited`: rate-limit answers
/// - `err`: other failed requests
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stats {
    pub tm: u64,
    pub polls: u32,
    pub skipped: u32,
    pub flights: u64,
    pub ticks: u64,
    pub limited: u32,
    pub err: u32,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "time={}s polls={} skipped={} flights={} ticks={} rate-limited={} errors={}",
            self.tm, self.polls, self.skipped, self.flights, self.ticks, self.limited, self.err
        )
    }
}
