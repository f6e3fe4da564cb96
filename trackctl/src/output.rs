//! Display flights, either as a table or as JSON.
//!

use eyre::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use flightwatch_engine::{Flight, TrackerStatus};
use flightwatch_formats::{to_feet, to_fpm, to_knots};

use crate::Output;

#[inline]
fn opt(v: Option<f64>, f: fn(f64) -> f64) -> String {
    v.map(|v| format!("{:.0}", f(v))).unwrap_or_default()
}

/// Table of flights in aviation units, sorted by callsign.
///
pub fn flights_table(flights: &[Flight]) -> String {
    let header = vec![
        "ICAO24", "Callsign", "Country", "Position", "Alt (ft)", "Speed (kt)", "Track",
        "V/S (fpm)", "Squawk", "Gnd",
    ];

    let mut all: Vec<&Flight> = flights.iter().collect();
    all.sort_by(|a, b| a.callsign.cmp(&b.callsign).then(a.icao24.cmp(&b.icao24)));

    let mut builder = Builder::default();
    builder.push_record(header);

    all.iter().for_each(|f| {
        builder.push_record(vec![
            f.icao24.clone(),
            f.callsign.clone().unwrap_or_default(),
            f.origin_country.clone(),
            f.display.to_string(),
            opt(f.baro_altitude, to_feet),
            opt(f.velocity, to_knots),
            opt(f.heading, |h| h),
            opt(f.vertical_rate, to_fpm),
            f.squawk.clone().unwrap_or_default(),
            if f.on_ground { "*".to_string() } else { String::new() },
        ]);
    });

    builder.build().with(Style::modern()).to_string()
}

/// One-line summary of the tracker state.
///
pub fn status_line(status: &TrackerStatus) -> String {
    let mut line = format!(
        "{} flights around {} ({}, {})",
        status.flights,
        status.area,
        status.source,
        if status.authenticated { "authenticated" } else { "anonymous" },
    );
    if let Some(left) = status.cooldown {
        line.push_str(&format!(" rate-limited, retrying in {left}s"));
    } else if let Some(err) = &status.last_error {
        line.push_str(&format!(" last error: {err}"));
    }
    line
}

pub fn print_flights(flights: &[Flight], status: &TrackerStatus, fmt: Output) -> Result<()> {
    match fmt {
        Output::Json => {
            println!("{}", serde_json::to_string(flights)?);
        }
        Output::Table => {
            eprintln!("{}", status_line(status));
            if !flights.is_empty() {
                println!("{}", flights_table(flights));
            }
        }
    }
    Ok(())
}
