//! Tracking engine for flightwatch.
//!
//! Aircraft positions come from the API every few tens of seconds at best.  In between, we
//! move each aircraft along its last known track & speed so the display stays fluid, and we
//! merge every new poll without making aircraft jump back.
//!
//! - `predict()` does the dead-reckoning
//! - `merge()` folds a fresh poll into what is displayed
//! - `PollGate` keeps us within the API rate-limits
//! - `Tracker` runs the whole thing in a `ractor` actor
//!

pub use auth::*;
pub use config::*;
pub use error::*;
pub use flight::*;
pub use geo::*;
pub use merge::*;
pub use policy::*;
pub use predict::*;
pub use sources::*;
pub use stats::*;
pub use tracker::*;

mod auth;
mod config;
mod error;
mod flight;
mod geo;
mod merge;
mod policy;
mod predict;
mod sources;
mod stats;
mod tracker;

const NAME: &str = env!("CARGO_PKG_NAME");
const EVERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> String {
    format!("{}/{}", NAME, EVERSION)
}
