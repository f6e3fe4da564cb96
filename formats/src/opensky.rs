//! Module to load and process the data coming from the Opensky API.
//!
//! XXX they send out an array of arrays, each representing a specific state vector, with
//!     `null` for every unknown value.  It sucks.
//!
//! Some deployments also append the aircraft category as an 18th field (`extended=1`), so we
//! decode vectors by position from generic JSON values instead of a fixed tuple.
//!
//! Documentation is taken from [The Opensky site](https://openskynetwork.github.io/opensky-api/rest.html)
//!

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use serde_repr::{Deserialize_repr, Serialize_repr};
use tracing::{trace, warn};

use crate::FormatError;

/// Minimum number of fields in a state vector.
const MIN_FIELDS: usize = 17;

/// Origin of state's position
///
#[derive(
    Clone, Copy, Debug, Default, Deserialize_repr, PartialEq, Serialize_repr, strum::Display,
)]
#[repr(u8)]
pub enum Source {
    #[default]
    AdsB = 0,
    Asterix,
    MLAT,
    FLARM,
}

/// Aircraft category
///
/// Only sent when asked for with `extended=1`.
///
#[derive(Clone, Copy, Debug, Deserialize_repr, PartialEq, Serialize_repr)]
#[repr(u8)]
pub enum Category {
    NoInfo = 0,
    NoAdsBEmitterCategoryInfo,
    Light,
    Small,
    Large,
    HighVortexLarge,
    Heavy,
    HighPerformance,
    RotorCraft,
    Glider,
    Lighter,
    Skydiver,
    UltraLight,
    Reserved,
    Space,
    SurfaceEmergencyVehicule,
    SurfaceServiceVehicule,
    PointObstacle,
    ClusterObstacle,
    LineObstacle,
}

// Public structs

/// This is the main container for packets sent by the API.
/// It includes a UNIX timestamp and a set of `StateVector`.
///
/// We assume that if two `StateList` have the same timestamp they have
/// the same payload.
///
/// Vectors that can not be decoded are logged and skipped, one bad aircraft should not
/// make us lose all the others.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(from = "Payload", into = "Payload")]
pub struct StateList {
    /// UNIX timestamp
    pub time: i64,
    /// The state vectors
    pub states: Option<Vec<StateVector>>,
}

impl StateList {
    /// Deserialize from json
    ///
    #[tracing::instrument(skip(input))]
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        let data: StateList = serde_json::from_str(input)?;
        trace!("{} points", data.len());
        Ok(data)
    }

    /// Number of state vectors
    ///
    #[inline]
    pub fn len(&self) -> usize {
        self.states.as_ref().map_or(0, |s| s.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the state vectors, if any
    ///
    pub fn iter(&self) -> impl Iterator<Item = &StateVector> {
        self.states.iter().flatten()
    }
}

/// Definition of a state vector as generated
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StateVector {
    /// ICAO ID
    pub icao24: String,
    /// Call-sign of the vehicule
    pub callsign: Option<String>,
    /// Origin Country
    pub origin_country: String,
    /// Timestamp of the last position update
    pub time_position: Option<i64>,
    /// Timestamp of the last message of any kind
    pub last_contact: i64,
    /// Position
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Meters
    pub baro_altitude: Option<f64>,
    pub on_ground: bool,
    /// Ground speed in m/s
    pub velocity: Option<f64>,
    /// Degrees clockwise from north
    pub true_track: Option<f64>,
    /// m/s, positive is climbing
    pub vertical_rate: Option<f64>,
    pub sensors: Option<Vec<i64>>,
    /// Meters
    pub geo_altitude: Option<f64>,
    pub squawk: Option<String>,
    pub spi: bool,
    /// Position source
    pub position_source: Source,
    /// Aircraft category
    pub category: Option<Category>,
}

impl TryFrom<&[Value]> for StateVector {
    type Error = FormatError;

    fn try_from(v: &[Value]) -> Result<Self, Self::Error> {
        if v.len() < MIN_FIELDS {
            return Err(FormatError::ShortVector(v.len()));
        }

        let icao24 = v[0]
            .as_str()
            .ok_or(FormatError::BadField("icao24"))?
            .to_string();
        let last_contact = v[4].as_i64().ok_or(FormatError::BadField("last_contact"))?;
        let position_source = match &v[16] {
            Value::Null => Source::default(),
            s => serde_json::from_value(s.clone())
                .map_err(|_| FormatError::BadField("position_source"))?,
        };
        let category = v
            .get(17)
            .and_then(|c| serde_json::from_value::<Category>(c.clone()).ok());
        let sensors = v[12].as_array().map(|a| a.iter().filter_map(Value::as_i64).collect());

        Ok(StateVector {
            icao24,
            // Callsigns are padded with spaces to 8 chars
            callsign: v[1]
                .as_str()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            origin_country: v[2].as_str().unwrap_or_default().to_string(),
            time_position: v[3].as_i64(),
            last_contact,
            longitude: v[5].as_f64(),
            latitude: v[6].as_f64(),
            baro_altitude: v[7].as_f64(),
            on_ground: v[8].as_bool().unwrap_or(false),
            velocity: v[9].as_f64(),
            true_track: v[10].as_f64(),
            vertical_rate: v[11].as_f64(),
            sensors,
            geo_altitude: v[13].as_f64(),
            squawk: v[14].as_str().map(str::to_string),
            spi: v[15].as_bool().unwrap_or(false),
            position_source,
            category,
        })
    }
}

impl From<&StateVector> for Vec<Value> {
    fn from(sv: &StateVector) -> Self {
        let mut v = vec![
            json!(sv.icao24),
            json!(sv.callsign),
            json!(sv.origin_country),
            json!(sv.time_position),
            json!(sv.last_contact),
            json!(sv.longitude),
            json!(sv.latitude),
            json!(sv.baro_altitude),
            json!(sv.on_ground),
            json!(sv.velocity),
            json!(sv.true_track),
            json!(sv.vertical_rate),
            json!(sv.sensors),
            json!(sv.geo_altitude),
            json!(sv.squawk),
            json!(sv.spi),
            json!(sv.position_source),
        ];
        if let Some(cat) = sv.category {
            v.push(json!(cat));
        }
        v
    }
}

// Private structs

/// Struct returned by the Opensky API
///
#[derive(Clone, Debug, Deserialize, Serialize)]
struct Payload {
    /// UNIX timestamp
    pub time: i64,
    /// State vectors, as arrays
    pub states: Option<Vec<Vec<Value>>>,
}

impl From<Payload> for StateList {
    fn from(p: Payload) -> Self {
        let states = p.states.map(|all| {
            all.iter()
                .filter_map(|raw| match StateVector::try_from(raw.as_slice()) {
                    Ok(sv) => Some(sv),
                    Err(e) => {
                        warn!("skipping state vector {raw:?}: {e}");
                        None
                    }
                })
                .collect::<Vec<_>>()
        });
        StateList {
            time: p.time,
            states,
        }
    }
}

impl From<StateList> for Payload {
    fn from(sl: StateList) -> Self {
        Payload {
            time: sl.time,
            states: sl
                .states
                .map(|all| all.iter().map(Vec::<Value>::from).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::Result;
    use rstest::rstest;

    const SAMPLE: &str = r##"{"time":1700000000,"states":[
        ["4b1805","SWR123  ","Switzerland",1699999998,1699999999,8.5492,47.4582,10972.8,false,231.5,85.2,0.0,null,11049.0,"1000",false,0],
        ["a0b1c2",null,"United States",null,1699999990,null,null,null,true,null,null,null,null,null,null,false,0],
        ["3c6444","DLH4AB  ","Germany",1699999999,1699999999,8.57,50.03,null,true,5.1,270.0,null,[1,2],null,null,false,2,6]
    ]}"##;

    #[test_pretty_log::test]
    fn test_statelist_from_json() -> Result<()> {
        let sl = StateList::from_json(SAMPLE)?;
        assert_eq!(1700000000, sl.time);
        assert_eq!(3, sl.len());

        let all: Vec<_> = sl.iter().collect();
        let swr = all[0];
        assert_eq!("4b1805", swr.icao24);
        assert_eq!(Some("SWR123".to_string()), swr.callsign);
        assert_eq!(Some(47.4582), swr.latitude);
        assert_eq!(Some(8.5492), swr.longitude);
        assert_eq!(Some(231.5), swr.velocity);
        assert_eq!(Some(85.2), swr.true_track);
        assert!(!swr.on_ground);
        assert_eq!(None, swr.category);

        let anon = all[1];
        assert_eq!(None, anon.callsign);
        assert_eq!(None, anon.latitude);
        assert!(anon.on_ground);

        let dlh = all[2];
        assert_eq!(Source::MLAT, dlh.position_source);
        assert_eq!(Some(Category::HighVortexLarge), dlh.category);
        assert_eq!(Some(vec![1, 2]), dlh.sensors);
        Ok(())
    }

    #[test]
    fn test_statelist_null_states() -> Result<()> {
        let sl = StateList::from_json(r##"{"time": 1700000000, "states": null}"##)?;
        assert!(sl.states.is_none());
        assert!(sl.is_empty());
        assert_eq!(0, sl.iter().count());
        Ok(())
    }

    #[test]
    fn test_statelist_skip_bad_vector() -> Result<()> {
        let input = r##"{"time": 1, "states": [
            ["abc", null, "X"],
            [42,null,"X",null,1,1.0,2.0,null,false,null,null,null,null,null,null,false,0],
            ["def",null,"X",null,1,1.0,2.0,null,false,null,null,null,null,null,null,false,0]
        ]}"##;
        let sl = StateList::from_json(input)?;
        assert_eq!(1, sl.len());
        assert_eq!("def", sl.iter().next().map(|s| s.icao24.as_str()).unwrap_or_default());
        Ok(())
    }

    #[rstest]
    #[case(vec![json!("abc")], FormatError::ShortVector(1))]
    #[case(vec![Value::Null; 17], FormatError::BadField("icao24"))]
    fn test_vector_errors(#[case] raw: Vec<Value>, #[case] err: FormatError) {
        assert_eq!(Err(err), StateVector::try_from(raw.as_slice()));
    }

    #[test]
    fn test_statelist_back_to_json() -> Result<()> {
        let sl = StateList::from_json(SAMPLE)?;
        let out = serde_json::to_string(&sl)?;
        assert!(out.starts_with(r##"{"time":1700000000,"states":[["4b1805","SWR123","Switzerland""##));

        let back = StateList::from_json(&out)?;
        assert_eq!(sl, back);
        Ok(())
    }
}
