use tracing::trace;

use flightwatch_engine::{haversine_km, predict, Position};
use flightwatch_formats::to_knots;

use crate::PredictOpts;

/// One-shot prediction, mostly to check what the tracker would show.
///
#[tracing::instrument]
pub fn predict_one(opts: &PredictOpts) -> String {
    let from = Position::new(opts.lat, opts.lon);
    let to = predict(
        from,
        Some(opts.speed),
        Some(opts.heading),
        opts.ground,
        opts.elapsed * 1_000.,
    );
    trace!("{from} -> {to}");

    format!(
        "From {} after {}s at {} m/s ({:.0} kt) on {}°: {} ({:.1} km)",
        from,
        opts.elapsed,
        opts.speed,
        to_knots(opts.speed),
        opts.heading,
        to,
        haversine_km(from, to)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    #[test]
    fn test_predict_one() {
        let opts = PredictOpts::try_parse_from([
            "predict", "--lat", "40", "--lon", "-74", "-s", "250", "-t", "90", "-e", "3600",
        ])
        .unwrap();

        let s = predict_one(&opts);
        assert!(s.contains("39.52275, -63.48305"), "{s}");
        assert!(s.contains("(900.0 km)"), "{s}");
        assert!(s.contains("486 kt"), "{s}");
    }

    #[test]
    fn test_predict_one_ground() {
        let opts = PredictOpts::try_parse_from([
            "predict", "--lat", "50.9", "--lon", "4.48", "-s", "10", "-t", "90", "-e", "60",
            "--ground",
        ])
        .unwrap();

        let s = predict_one(&opts);
        assert!(s.ends_with(": 50.90000, 4.48000 (0.0 km)"), "{s}");
    }
}
