//! Definition of the data formats we get from the flight APIs.
//!
//! Right now this is only the [Opensky] `/states` family of endpoints, which return a timestamp
//! and a list of state vectors, each of them being a JSON array instead of an object.
//!
//! [Opensky]: https://openskynetwork.github.io/opensky-api/rest.html
//!

pub use error::*;
pub use opensky::*;
pub use units::*;

mod error;
mod opensky;
mod units;
