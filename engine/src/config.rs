//! Tracker configuration, read from `trackctl.hcl`.
//!
//! ```hcl
//! version = 1
//! base_url = "https://opensky-network.org/api"
//! auth {
//!   username = "me"
//!   password = "secret"
//! }
//! poll {
//!   anonymous = 60
//!   authenticated = 15
//!   min_interval = 10
//!   cooldown = 300
//! }
//! tick = 1000
//! max_extrapolation = 120
//! timeout = 30
//! ```
//!
//! Everything but `version` is optional.
//!

use std::time::Duration;

use eyre::Result;
use serde::Deserialize;
use tracing::debug;

use flightwatch_common::{into_configfile, ConfigError, IntoConfig, Versioned};

use crate::policy::seconds;
use crate::{Auth, Opensky, PollPolicy, Source, MAX_SECS, OPENSKY_URL};

/// Prediction tick in ms
const DEF_TICK: u64 = 1_000;
/// Longest extrapolation in seconds
const DEF_MAX_EXTRAPOLATION: u64 = 120;
/// HTTP timeout in seconds
const DEF_TIMEOUT: u64 = 30;

#[into_configfile(version = 1, filename = "trackctl.hcl")]
#[derive(Clone, Debug, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub auth: Option<Auth>,
    #[serde(default)]
    pub poll: PollPolicy,
    /// ms
    #[serde(default = "default_tick")]
    pub tick: u64,
    /// s
    #[serde(default = "default_max_extrapolation")]
    pub max_extrapolation: u64,
    /// s
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_base_url() -> String {
    OPENSKY_URL.to_string()
}

fn default_tick() -> u64 {
    DEF_TICK
}

fn default_max_extrapolation() -> u64 {
    DEF_MAX_EXTRAPOLATION
}

fn default_timeout() -> u64 {
    DEF_TIMEOUT
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            version: Self::VERSION,
            base_url: default_base_url(),
            auth: None,
            poll: PollPolicy::default(),
            tick: DEF_TICK,
            max_extrapolation: DEF_MAX_EXTRAPOLATION,
            timeout: DEF_TIMEOUT,
        }
    }
}

impl TrackerConfig {
    #[inline]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick)
    }

    #[inline]
    pub fn max_extrapolation(&self) -> chrono::Duration {
        seconds(self.max_extrapolation)
    }

    /// Reject values the tracker can not run with: zero periods, or durations beyond `MAX_SECS`.
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick == 0 {
            return Err(ConfigError::Invalid("tick must be > 0".to_string()));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Invalid("timeout must be > 0".to_string()));
        }
        if self.max_extrapolation > MAX_SECS {
            return Err(ConfigError::Invalid(format!(
                "max_extrapolation is {}s, max is {MAX_SECS}s",
                self.max_extrapolation
            )));
        }
        self.poll.validate()
    }

    /// Build the live API source from this configuration.
    ///
    #[tracing::instrument(skip(self))]
    pub fn opensky(&self) -> Result<Source> {
        let auth = self.auth.clone().unwrap_or_default();
        debug!("opensky at {} as {}", self.base_url, auth);

        let src = Opensky::new(&self.base_url, auth, Duration::from_secs(self.timeout))?;
        Ok(Source::from(src))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flightwatch_common::ConfigFile;
    use rstest::rstest;

    #[test]
    fn test_config_minimal() -> Result<()> {
        let cfg = ConfigFile::<TrackerConfig>::parse("version = 1\n")?;

        assert_eq!(1, cfg.version());
        assert_eq!(OPENSKY_URL, cfg.base_url);
        assert_eq!(None, cfg.auth);
        assert_eq!(PollPolicy::default(), cfg.poll);
        assert_eq!(Duration::from_secs(1), cfg.tick());
        assert_eq!(chrono::Duration::seconds(120), cfg.max_extrapolation());
        assert_eq!(30, cfg.timeout);
        Ok(())
    }

    #[test]
    fn test_config_full() -> Result<()> {
        let s = r##"
version = 1
base_url = "http://localhost:8080/api"
auth {
  username = "john"
  password = "doe"
}
poll {
  authenticated = 5
  cooldown = 60
}
tick = 500
max_extrapolation = 30
timeout = 10
"##;
        let cfg = ConfigFile::<TrackerConfig>::parse(s)?;

        assert!(cfg.auth.as_ref().is_some_and(|a| a.is_authenticated()));
        assert_eq!(5, cfg.poll.authenticated);
        assert_eq!(60, cfg.poll.anonymous);
        assert_eq!(60, cfg.poll.cooldown);
        assert_eq!(Duration::from_millis(500), cfg.tick());

        let src = cfg.opensky()?;
        assert_eq!("opensky", src.name());
        assert!(src.is_authenticated());
        Ok(())
    }

    #[test]
    fn test_config_no_version() {
        assert!(ConfigFile::<TrackerConfig>::parse("tick = 500\n").is_err());
    }

    #[test]
    fn test_config_default() {
        let cfg = TrackerConfig::default();
        assert_eq!(TrackerConfig::VERSION, cfg.version());
        assert_eq!("trackctl.hcl", TrackerConfig::FILENAME);
    }

    #[rstest]
    #[case("version = 1\n", true)]
    #[case("version = 1\ntick = 0\n", false)]
    #[case("version = 1\ntimeout = 0\n", false)]
    #[case("version = 1\nmax_extrapolation = 86400\n", true)]
    #[case("version = 1\nmax_extrapolation = 10000000000000000\n", false)]
    #[case("version = 1\npoll {\n  anonymous = 0\n}\n", false)]
    #[case("version = 1\npoll {\n  authenticated = 0\n}\n", false)]
    #[case("version = 1\npoll {\n  cooldown = 18446744073709551615\n}\n", false)]
    fn test_config_validate(#[case] s: &str, #[case] ok: bool) -> Result<()> {
        let cfg = ConfigFile::<TrackerConfig>::parse(s)?;
        assert_eq!(ok, cfg.validate().is_ok());
        Ok(())
    }
}
