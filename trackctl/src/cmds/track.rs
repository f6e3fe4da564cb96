use std::time::Duration;

use eyre::{eyre, Result};
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use flightwatch_common::{load_locations, Location};
use flightwatch_engine::{
    Area, Replay, Source, Stats, Tracker, TrackerArgs, TrackerConfig, TrackerError,
};

use crate::{print_flights, TrackOpts};

/// Run the tracker until `--duration` is over or we get Ctrl-C, printing flights every
/// `--every` seconds.
///
#[tracing::instrument(skip(cfg))]
pub async fn track(cfg: &TrackerConfig, opts: &TrackOpts) -> Result<Stats> {
    let area = area_from_opts(opts)?;

    let source = match &opts.replay {
        Some(fname) => {
            info!("Replaying {:?}", fname);
            let replay = Replay::from_file(fname)?;
            if replay.is_empty() {
                return Err(eyre!("nothing to replay in {}", fname.to_string_lossy()));
            }
            Source::from(replay)
        }
        None => cfg.opensky()?,
    };

    eprintln!("Tracking {} from {}", area, source.name());

    let args = TrackerArgs::new(source, area)
        .policy(cfg.poll)
        .tick(cfg.tick())
        .max_extrapolation(cfg.max_extrapolation());
    let tracker = Tracker::start(args).await?;

    let mut every = interval(Duration::from_secs(opts.every.max(1)));
    every.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // No duration means forever
    //
    let deadline = opts
        .duration
        .map(|d| Instant::now() + Duration::from_secs(d));
    let end = async move {
        match deadline {
            Some(d) => sleep_until(d).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(end);

    loop {
        tokio::select! {
            _ = every.tick() => {
                let flights = tracker.snapshot().await?;
                let status = tracker.status().await?;
                trace!("{} flights", flights.len());
                print_flights(&flights, &status, opts.format)?;
            }
            _ = &mut end => {
                info!("Duration reached.");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted.");
                break;
            }
        }
    }

    let stats = tracker.stop().await?;
    Ok(stats)
}

/// Either a named location or explicit coordinates.
///
pub fn area_from_opts(opts: &TrackOpts) -> Result<Area> {
    let center = match (&opts.location, opts.lat, opts.lon) {
        (Some(name), _, _) => {
            let all = load_locations(opts.locations.as_deref())?;
            match all.get(name) {
                Some(loc) => loc.clone(),
                None => return Err(TrackerError::UnknownLocation(name.clone()).into()),
            }
        }
        (None, Some(lat), Some(lon)) => {
            if !(-90. ..=90.).contains(&lat) || !(-180. ..=180.).contains(&lon) {
                return Err(eyre!("bad coordinates {lat}, {lon}"));
            }
            Location::new(lat, lon)
        }
        _ => return Err(eyre!("need either --location or --lat/--lon")),
    };
    debug!("center: {:?}", center);

    Ok(Area::new(center, opts.radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;
    use rstest::rstest;

    fn parse(args: &[&str]) -> TrackOpts {
        let mut all = vec!["track"];
        all.extend_from_slice(args);
        TrackOpts::try_parse_from(all).unwrap()
    }

    #[test]
    fn test_area_named() -> Result<()> {
        let area = area_from_opts(&parse(&["-l", "brussels"]))?;
        assert_eq!(50.9, area.center.lat);
        assert_eq!(4.48, area.center.lon);
        assert_eq!(25, area.radius);
        Ok(())
    }

    #[test]
    fn test_area_coordinates() -> Result<()> {
        let area = area_from_opts(&parse(&["--lat", "40.6", "--lon", "-73.8", "-r", "10"]))?;
        assert_eq!(Location::new(40.6, -73.8), area.center);
        assert_eq!(10, area.radius);
        Ok(())
    }

    #[rstest]
    #[case(&["-l", "atlantis"])]
    #[case(&["--lat", "91", "--lon", "0"])]
    #[case(&["--lat", "0", "--lon", "200"])]
    #[case(&[])]
    fn test_area_bad(#[case] args: &[&str]) {
        assert!(area_from_opts(&parse(args)).is_err());
    }

    #[test]
    fn test_opts_conflict() {
        assert!(TrackOpts::try_parse_from(["track", "-l", "jfk", "--lat", "1", "--lon", "2"]).is_err());
        assert!(TrackOpts::try_parse_from(["track", "--lat", "1"]).is_err());
    }
}
