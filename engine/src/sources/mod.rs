//! Where state vectors come from.
//!
//! There are two sources:
//! - `Opensky` is the live REST API
//! - `Replay` plays back previously recorded answers, for demos & tests
//!
//! Both answer a bounding box query with a `Poll`.
//!

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use flightwatch_common::{Location, BB};
use flightwatch_formats::StateList;

pub use opensky::*;
pub use replay::*;

use crate::{AreaKey, FetchError};

mod opensky;
mod replay;

/// Default search radius in nautical miles
pub const DEF_RADIUS: u32 = 25;

/// Watched area: a center and a radius.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Area {
    pub center: Location,
    /// Nautical miles
    pub radius: u32,
}

impl Area {
    pub fn new(center: Location, radius: u32) -> Self {
        Area { center, radius }
    }

    #[inline]
    pub fn bb(&self) -> BB {
        BB::from_location(&self.center, self.radius)
    }

    #[inline]
    pub fn key(&self) -> AreaKey {
        AreaKey::from(&self.center)
    }
}

impl Display for Area {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4}, {:.4} ({} nm)",
            self.center.lat, self.center.lon, self.radius
        )
    }
}

/// One answer from a source.
///
#[derive(Clone, Debug)]
pub struct Poll {
    pub list: StateList,
    /// Whether the answer was obtained with credentials
    pub authenticated: bool,
}

/// All our sources.
///
#[derive(Clone, Debug)]
pub enum Source {
    Opensky(Opensky),
    Replay(Replay),
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::Opensky(_) => "opensky",
            Source::Replay(_) => "replay",
        }
    }

    /// Whether we expect to be polling with credentials.
    ///
    pub fn is_authenticated(&self) -> bool {
        match self {
            Source::Opensky(s) => s.is_authenticated(),
            Source::Replay(s) => s.is_authenticated(),
        }
    }

    /// Get the current state vectors for `area`.
    ///
    pub async fn fetch(&self, area: &Area) -> Result<Poll, FetchError> {
        match self {
            Source::Opensky(s) => s.fetch(area).await,
            Source::Replay(s) => s.fetch(area).await,
        }
    }
}

impl From<Opensky> for Source {
    fn from(value: Opensky) -> Self {
        Source::Opensky(value)
    }
}

impl From<Replay> for Source {
    fn from(value: Replay) -> Self {
        Source::Replay(value)
    }
}
