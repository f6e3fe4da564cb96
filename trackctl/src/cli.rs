//! Module describing all possible commands and sub-commands to the `trackctl` main driver
//!
//! We have three main commands:
//!
//! - `track` runs the tracker around a location and prints what it sees
//! - `predict` is a one-shot dead-reckoning computation
//! - `list` shows the named locations
//!
//! `completion` is here just to configure the various shells completion system.
//!

use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser, ValueEnum};
use clap_complete::shells::Shell;

use flightwatch_engine::DEF_RADIUS;

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// debug mode (hierarchical traces).
    #[clap(short = 'D', long = "debug")]
    pub debug: bool,
    /// Also log into an hourly file in this directory.
    #[clap(short = 'L', long)]
    pub log_dir: Option<PathBuf>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `completion SHELL`
/// `list locations`
/// `predict --lat LAT --lon LON --speed M/S --heading DEG --elapsed S [--ground]`
/// `track [-l NAME | --lat LAT --lon LON] [-r NM] [-d S] [-e S] [--replay FILE]`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// List information about things
    List(ListOpts),
    /// Predict a single position
    Predict(PredictOpts),
    /// Track aircraft around a location
    Track(TrackOpts),
    /// List all package versions
    Version,
}

// ------

/// Options for `track`.
///
#[derive(Debug, Parser)]
pub struct TrackOpts {
    /// Named location (see `list locations`).
    #[clap(short = 'l', long, conflicts_with_all = ["lat", "lon"])]
    pub location: Option<String>,
    /// Latitude of the center.
    #[clap(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Longitude of the center.
    #[clap(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// Radius in nautical miles.
    #[clap(short = 'r', long, default_value_t = DEF_RADIUS)]
    pub radius: u32,
    /// Stop after this many seconds, run until Ctrl-C otherwise.
    #[clap(short = 'd', long)]
    pub duration: Option<u64>,
    /// Print flights every N seconds.
    #[clap(short = 'e', long, default_value = "5")]
    pub every: u64,
    /// Output format.
    #[clap(short = 'F', long, value_enum, default_value = "table")]
    pub format: Output,
    /// Alternate locations file.
    #[clap(long)]
    pub locations: Option<PathBuf>,
    /// Replay recorded answers (JSON lines) instead of polling the API.
    #[clap(long)]
    pub replay: Option<PathBuf>,
}

/// How to print flights.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum Output {
    /// One JSON array per update
    Json,
    #[default]
    Table,
}

// ------

/// Options for `predict`.
///
#[derive(Debug, Parser)]
pub struct PredictOpts {
    /// Latitude of the last known position.
    #[clap(long, allow_negative_numbers = true)]
    pub lat: f64,
    /// Longitude of the last known position.
    #[clap(long, allow_negative_numbers = true)]
    pub lon: f64,
    /// Ground speed in m/s.
    #[clap(short = 's', long)]
    pub speed: f64,
    /// True track in degrees.
    #[clap(short = 't', long)]
    pub heading: f64,
    /// Seconds since the last known position.
    #[clap(short = 'e', long)]
    pub elapsed: f64,
    /// Aircraft is on the ground.
    #[clap(long)]
    pub ground: bool,
}

// ------

/// Options for `list`.
///
#[derive(Debug, Parser)]
pub struct ListOpts {
    /// Radius in nautical miles for the bounding boxes.
    #[clap(short = 'r', long, default_value_t = DEF_RADIUS)]
    pub radius: u32,
    /// Alternate locations file.
    #[clap(long)]
    pub locations: Option<PathBuf>,
    #[clap(subcommand)]
    pub cmd: ListSubCommand,
}

#[derive(Clone, Copy, Debug, PartialEq, Parser)]
pub enum ListSubCommand {
    /// List all named locations.
    Locations,
}

// ------

/// Options for `completion`.
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}
