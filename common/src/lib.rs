//! This library is there to share some common code amongst all flightwatch modules.
//!
//! - `ConfigFile` finds and loads versioned HCL configuration files
//! - `init_logging()` sets up `tracing` the same way for every binary
//! - `Location` and `BB` describe the areas we are watching
//!

use clap::{crate_name, crate_version};

pub use config::*;
pub use error::*;
pub use location::*;
pub use logging::*;

// Re-export so users of `ConfigFile` only need one dependency.
pub use flightwatch_macros::into_configfile;

mod config;
mod error;
mod location;
mod logging;
mod macros;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
