//! Poll scheduling and rate-limit policy.
//!
//! The API gives far more credits to authenticated users, so we poll at two different rates.
//! On top of the poll timer, `PollGate` decides whether a given poll should really hit the
//! network:
//!
//! - never two requests at the same time
//! - nothing while we are rate-limited, until the cooldown expires
//! - nothing sooner than `min_interval` after the last successful fetch, unless the watched area
//!   moved enough to change its `AreaKey`
//!

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use flightwatch_common::{ConfigError, Location};

/// Longest we ever stay quiet or extrapolate, in seconds (one day)
pub const MAX_SECS: u64 = 86_400;

/// Poll intervals & cooldown, all in seconds.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PollPolicy {
    /// Interval for anonymous access
    pub anonymous: u64,
    /// Interval for authenticated access
    pub authenticated: u64,
    /// Minimum time between two fetches of the same area
    pub min_interval: u64,
    /// How long we stay quiet after a rate-limit answer without a retry hint
    pub cooldown: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            anonymous: 60,
            authenticated: 15,
            min_interval: 10,
            cooldown: 300,
        }
    }
}

impl PollPolicy {
    /// Poll timer period depending on our access
    ///
    #[inline]
    pub fn interval(&self, authenticated: bool) -> std::time::Duration {
        let secs = if authenticated {
            self.authenticated
        } else {
            self.anonymous
        };
        std::time::Duration::from_secs(secs)
    }

    #[inline]
    pub fn cooldown(&self) -> Duration {
        seconds(self.cooldown)
    }

    /// How long to back off after a rate-limit answer.  The server hint wins when present but is
    /// capped at `MAX_SECS`.
    ///
    pub fn backoff(&self, hint: Option<u64>) -> Duration {
        match hint {
            Some(s) => seconds(s),
            None => self.cooldown(),
        }
    }

    /// Check that the timers can be armed and the durations make sense.
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.anonymous == 0 || self.authenticated == 0 {
            return Err(ConfigError::Invalid("poll intervals must be > 0".to_string()));
        }
        for (name, v) in [
            ("anonymous", self.anonymous),
            ("authenticated", self.authenticated),
            ("min_interval", self.min_interval),
            ("cooldown", self.cooldown),
        ] {
            if v > MAX_SECS {
                return Err(ConfigError::Invalid(format!(
                    "poll.{name} is {v}s, max is {MAX_SECS}s"
                )));
            }
        }
        Ok(())
    }
}

/// Seconds to `Duration`, capped at `MAX_SECS`.
///
#[inline]
pub(crate) fn seconds(s: u64) -> Duration {
    Duration::seconds(s.min(MAX_SECS) as i64)
}

/// Coarse key for the watched area, in tenths of a degree.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AreaKey(i32, i32);

impl AreaKey {
    pub fn new(lat: f64, lon: f64) -> Self {
        AreaKey((lat * 10.).round() as i32, (lon * 10.).round() as i32)
    }
}

impl From<&Location> for AreaKey {
    fn from(loc: &Location) -> Self {
        AreaKey::new(loc.lat, loc.lon)
    }
}

/// What to do with a poll request.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    /// Go ahead
    Fetch,
    /// A request is already running
    InFlight,
    /// Last fetch of this area is too recent, remaining time before the next one
    TooSoon(Duration),
    /// Rate-limited, remaining cooldown
    RateLimited(Duration),
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Fetch => write!(f, "fetch"),
            Decision::InFlight => write!(f, "in-flight"),
            Decision::TooSoon(d) => write!(f, "too soon ({}s)", d.num_seconds()),
            Decision::RateLimited(d) => write!(f, "rate-limited ({}s)", d.num_seconds()),
        }
    }
}

/// Guard state for polls.
///
#[derive(Clone, Debug)]
pub struct PollGate {
    min_interval: Duration,
    /// Last successful fetch and its area
    last: Option<(DateTime<Utc>, AreaKey)>,
    /// Rate-limit deadline
    cooldown_until: Option<DateTime<Utc>>,
    in_flight: bool,
}

impl PollGate {
    pub fn new(policy: &PollPolicy) -> Self {
        PollGate {
            min_interval: seconds(policy.min_interval),
            last: None,
            cooldown_until: None,
            in_flight: false,
        }
    }

    /// Should we fetch `area` at `now`?
    ///
    #[tracing::instrument(skip(self))]
    pub fn check(&self, now: DateTime<Utc>, area: AreaKey) -> Decision {
        if self.in_flight {
            return Decision::InFlight;
        }
        if let Some(left) = self.remaining_cooldown(now) {
            return Decision::RateLimited(left);
        }
        if let Some((at, key)) = self.last {
            let next = at
                .checked_add_signed(self.min_interval)
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            if key == area && now < next {
                return Decision::TooSoon(next - now);
            }
        }
        trace!("gate open");
        Decision::Fetch
    }

    /// A request is starting.
    ///
    #[inline]
    pub fn begin(&mut self) {
        self.in_flight = true;
    }

    /// The request went through.
    ///
    pub fn succeeded(&mut self, now: DateTime<Utc>, area: AreaKey) {
        self.in_flight = false;
        self.last = Some((now, area));
        self.cooldown_until = None;
    }

    /// The request failed, nothing to remember besides being done.
    ///
    #[inline]
    pub fn failed(&mut self) {
        self.in_flight = false;
    }

    /// We have been told to back off for `retry_after`.
    ///
    pub fn rate_limited(&mut self, now: DateTime<Utc>, retry_after: Duration) {
        self.in_flight = false;
        let until = now
            .checked_add_signed(retry_after)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.cooldown_until = Some(until);
        debug!("rate-limited until {:?}", self.cooldown_until);
    }

    /// Countdown until we may poll again, if rate-limited.
    ///
    pub fn remaining_cooldown(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.cooldown_until
            .filter(|until| now < *until)
            .map(|until| until - now)
    }

    #[inline]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
    }

    #[fixture]
    fn gate() -> PollGate {
        PollGate::new(&PollPolicy::default())
    }

    #[test]
    fn test_policy_interval() {
        let p = PollPolicy::default();
        assert_eq!(std::time::Duration::from_secs(15), p.interval(true));
        assert_eq!(std::time::Duration::from_secs(60), p.interval(false));
        assert!(p.interval(true) < p.interval(false));
    }

    #[rstest]
    #[case(50.91, 4.48, 50.94, 4.52, true)]
    #[case(50.91, 4.48, 51.2, 4.48, false)]
    #[case(-0.04, 0., 0.04, 0., true)]
    fn test_area_key(
        #[case] lat1: f64,
        #[case] lon1: f64,
        #[case] lat2: f64,
        #[case] lon2: f64,
        #[case] same: bool,
    ) {
        assert_eq!(same, AreaKey::new(lat1, lon1) == AreaKey::new(lat2, lon2));
    }

    #[rstest]
    fn test_gate_first_poll(gate: PollGate, now: DateTime<Utc>) {
        assert_eq!(Decision::Fetch, gate.check(now, AreaKey::new(1., 2.)));
    }

    #[rstest]
    fn test_gate_in_flight(mut gate: PollGate, now: DateTime<Utc>) {
        let area = AreaKey::new(1., 2.);
        gate.begin();
        assert_eq!(Decision::InFlight, gate.check(now, area));
        gate.failed();
        assert_eq!(Decision::Fetch, gate.check(now, area));
    }

    #[rstest]
    fn test_gate_too_soon(mut gate: PollGate, now: DateTime<Utc>) {
        let area = AreaKey::new(1., 2.);
        gate.begin();
        gate.succeeded(now, area);

        let later = now + Duration::seconds(4);
        assert_eq!(
            Decision::TooSoon(Duration::seconds(6)),
            gate.check(later, area)
        );
        assert_eq!(
            Decision::Fetch,
            gate.check(now + Duration::seconds(10), area)
        );
    }

    #[rstest]
    fn test_gate_area_moved(mut gate: PollGate, now: DateTime<Utc>) {
        gate.succeeded(now, AreaKey::new(1., 2.));
        assert_eq!(
            Decision::Fetch,
            gate.check(now + Duration::seconds(1), AreaKey::new(3., 2.))
        );
    }

    #[rstest]
    fn test_gate_rate_limited(mut gate: PollGate, now: DateTime<Utc>) {
        let area = AreaKey::new(1., 2.);
        gate.begin();
        gate.rate_limited(now, Duration::seconds(120));
        assert!(!gate.is_in_flight());

        let later = now + Duration::seconds(20);
        assert_eq!(
            Decision::RateLimited(Duration::seconds(100)),
            gate.check(later, area)
        );
        assert_eq!(Some(Duration::seconds(100)), gate.remaining_cooldown(later));

        let after = now + Duration::seconds(120);
        assert_eq!(None, gate.remaining_cooldown(after));
        assert_eq!(Decision::Fetch, gate.check(after, area));
    }

    #[rstest]
    #[case(Some(120), Duration::seconds(120))]
    #[case(None, Duration::seconds(300))]
    #[case(Some(10_000_000_000_000), Duration::seconds(MAX_SECS as i64))]
    #[case(Some(u64::MAX), Duration::seconds(MAX_SECS as i64))]
    fn test_policy_backoff(#[case] hint: Option<u64>, #[case] want: Duration) {
        assert_eq!(want, PollPolicy::default().backoff(hint));
    }

    #[rstest]
    fn test_gate_rate_limited_far_future(mut gate: PollGate, now: DateTime<Utc>) {
        // Past the last date chrono can represent
        gate.rate_limited(now, Duration::days(365 * 300_000));
        assert_eq!(
            Some(DateTime::<Utc>::MAX_UTC - now),
            gate.remaining_cooldown(now)
        );
        assert!(matches!(
            gate.check(now, AreaKey::new(1., 2.)),
            Decision::RateLimited(_)
        ));
    }

    #[rstest]
    #[case(PollPolicy::default(), true)]
    #[case(PollPolicy { anonymous: 0, ..Default::default() }, false)]
    #[case(PollPolicy { authenticated: 0, ..Default::default() }, false)]
    #[case(PollPolicy { min_interval: 0, ..Default::default() }, true)]
    #[case(PollPolicy { cooldown: u64::MAX, ..Default::default() }, false)]
    #[case(PollPolicy { anonymous: MAX_SECS + 1, ..Default::default() }, false)]
    fn test_policy_validate(#[case] p: PollPolicy, #[case] ok: bool) {
        assert_eq!(ok, p.validate().is_ok());
    }
}
