//! Location related module
//!
//! A `Location` is a named point we want to watch traffic around, a `BB` is the bounding box
//! derived from it and a distance, which is what the flight APIs take as query.
//!
//! Named locations are stored in `locations.hcl`, a default one is embedded.
//!
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use eyre::Result;
use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::trace;

use crate::ConfigError;

/// one degree is circumference of earth / 360°, convert into nautical miles
const ONE_DEG_NM: f64 = (40_000. / 1.852) / 360.;

/// Actual location
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Location {
    /// Plus code encoded location
    #[serde(default)]
    pub code: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
}

impl Location {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Location {
            code: String::new(),
            lat,
            lon,
        }
    }
}

/// Bounding box
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BB {
    /// Longitude - X0
    pub min_lon: f64,
    /// Latitude - Y0
    pub min_lat: f64,
    /// Longitude - X1
    pub max_lon: f64,
    /// Latitude - Y1
    pub max_lat: f64,
}

impl BB {
    /// Take a location and create a bounding box of `dist` nautical miles away
    ///
    #[tracing::instrument]
    pub fn from_location(value: &Location, dist: u32) -> Self {
        Self::from_lat_lon(value.lat, value.lon, dist)
    }

    /// Take a lat lon tuple and create a bounding box of `dist` nautical miles away
    ///
    /// The longitude span is widened with the latitude so the box stays roughly square on the
    /// ground.  Latitudes are clamped to ±90°.
    ///
    /// NOTE: `dist` is in Nautical Miles
    ///
    #[tracing::instrument]
    pub fn from_lat_lon(lat: f64, lon: f64, dist: u32) -> Self {
        let dlat = dist as f64 / ONE_DEG_NM;
        let dlon = dlat / lat.to_radians().cos().max(0.01);

        let (min_lat, max_lat) = ((lat - dlat).max(-90.), (lat + dlat).min(90.));
        let (min_lon, max_lon) = (lon - dlon, lon + dlon);

        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Check whether a given point is inside the box
    ///
    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Current location file version
const LOCATION_FILE_VER: usize = 1;

/// On-disk structure for the locations file
///
#[derive(Debug, Deserialize)]
struct LocationsFile {
    /// Version number for safety
    pub version: usize,
    /// List of locations
    pub location: BTreeMap<String, Location>,
}

/// Load all locations, from the given file or the embedded default.
///
#[tracing::instrument]
pub fn load_locations(fname: Option<&Path>) -> Result<BTreeMap<String, Location>> {
    trace!("enter");

    let data = if let Some(fname) = fname {
        fs::read_to_string(fname)?
    } else {
        include_str!("locations.hcl").to_owned()
    };

    let loc: LocationsFile = hcl::from_str(&data)?;
    if loc.version != LOCATION_FILE_VER {
        return Err(ConfigError::BadLocationsVersion(loc.version, LOCATION_FILE_VER).into());
    }
    Ok(loc.location)
}

/// List loaded locations
///
#[tracing::instrument(skip(data))]
pub fn list_locations(data: &BTreeMap<String, Location>, dist: u32) -> String {
    let header = vec!["Location", "Plus Code", "Lat/Lon", "Bounding box"];

    let mut builder = Builder::default();
    builder.push_record(header);

    data.iter().for_each(|(name, loc)| {
        let bb = BB::from_location(loc, dist);
        let point = format!("{:.2}, {:.2}", loc.lat, loc.lon);
        let bb = format!(
            "{:.2}, {:.2}, {:.2}, {:.2}",
            bb.min_lat, bb.min_lon, bb.max_lat, bb.max_lon
        );
        builder.push_record(vec![name.clone(), loc.code.clone(), point, bb]);
    });

    let allf = builder.build().with(Style::modern()).to_string();
    format!("List all locations ({dist} nm):\n{allf}")
}
