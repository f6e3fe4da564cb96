//! Tracker actor
//!
//! All mutable state lives here and every change goes through the mailbox, so polls, fetch
//! results, prediction ticks and queries are naturally serialised.
//!
//! Operations:
//! - `Start`/`Stop` arm or clear the poll & tick timers
//! - `Poll` asks the gate and maybe spawns a fetch, which comes back as `Fetched`
//! - `Tick` moves every displayed position along its prediction
//! - `SetArea` changes what we watch
//! - `Snapshot`/`Status` answer queries
//!

use std::time::Duration;

use chrono::{DateTime, Utc};
use ractor::concurrency::JoinHandle;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use flightwatch_common::ConfigError;

use crate::{
    flights_from, merge, Area, AreaKey, Decision, FetchError, Flight, Poll, PollGate,
    PollPolicy, Source, Stats, TrackerError,
};

/// The actor itself.
///
pub struct TrackerActor;

#[derive(Debug)]
pub enum TrackerMsg {
    /// Arm timers and poll right away.
    Start,
    /// Clear timers, keep the flights.
    Stop,
    /// Poll timer fired.
    Poll,
    /// Result of a fetch for a given area.
    Fetched(AreaKey, Result<Poll, FetchError>),
    /// Prediction timer fired.
    Tick,
    /// Watch another area.
    SetArea(Area),
    /// Current flights.
    Snapshot(RpcReplyPort<Vec<Flight>>),
    /// Current status.
    Status(RpcReplyPort<TrackerStatus>),
}

/// What we need to start.
///
#[derive(Clone, Debug)]
pub struct TrackerArgs {
    pub source: Source,
    pub area: Area,
    pub policy: PollPolicy,
    /// Prediction tick
    pub tick: Duration,
    /// Longest extrapolation from the last known position
    pub max_extrapolation: chrono::Duration,
}

impl TrackerArgs {
    pub fn new(source: Source, area: Area) -> Self {
        TrackerArgs {
            source,
            area,
            policy: PollPolicy::default(),
            tick: Duration::from_secs(1),
            max_extrapolation: chrono::Duration::seconds(120),
        }
    }

    pub fn policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn max_extrapolation(mut self, max: chrono::Duration) -> Self {
        self.max_extrapolation = max;
        self
    }

    /// Timers need a non-zero period.
    ///
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.tick.is_zero() {
            return Err(ConfigError::Invalid("tick must be > 0".to_string()).into());
        }
        if self.max_extrapolation < chrono::Duration::zero() {
            return Err(ConfigError::Invalid("max_extrapolation must be >= 0".to_string()).into());
        }
        Ok(self.policy.validate()?)
    }
}

/// Snapshot of the tracker status, for display.
///
#[derive(Clone, Debug, Serialize)]
pub struct TrackerStatus {
    pub source: &'static str,
    pub area: Area,
    pub running: bool,
    pub authenticated: bool,
    pub initial_loaded: bool,
    pub in_flight: bool,
    pub flights: usize,
    /// Seconds before polling resumes, if rate-limited
    pub cooldown: Option<i64>,
    pub last_error: Option<String>,
    pub stats: Stats,
}

pub struct TrackerState {
    source: Source,
    area: Area,
    policy: PollPolicy,
    tick: Duration,
    max_extrapolation: chrono::Duration,

    gate: PollGate,
    flights: Vec<Flight>,
    /// Whether the last answer came with credentials
    authenticated: bool,
    initial_loaded: bool,
    running: bool,
    last_error: Option<String>,

    poll_timer: Option<JoinHandle<()>>,
    tick_timer: Option<JoinHandle<()>>,

    start: DateTime<Utc>,
    stats: Stats,
    out: watch::Sender<Vec<Flight>>,
}

impl TrackerState {
    fn arm_poll(&mut self, myself: &ActorRef<TrackerMsg>) {
        if let Some(h) = self.poll_timer.take() {
            h.abort();
        }
        let every = self.policy.interval(self.authenticated);
        debug!("poll every {:?}", every);
        self.poll_timer = Some(myself.send_interval(every, || TrackerMsg::Poll));
    }

    fn disarm(&mut self) {
        for h in [self.poll_timer.take(), self.tick_timer.take()]
            .into_iter()
            .flatten()
        {
            h.abort();
        }
    }

    fn publish(&self) {
        self.out.send_replace(self.flights.clone());
    }

    fn status(&self, now: DateTime<Utc>) -> TrackerStatus {
        let mut stats = self.stats.clone();
        stats.tm = (now - self.start).num_seconds().max(0) as u64;

        TrackerStatus {
            source: self.source.name(),
            area: self.area.clone(),
            running: self.running,
            authenticated: self.authenticated,
            initial_loaded: self.initial_loaded,
            in_flight: self.gate.is_in_flight(),
            flights: self.flights.len(),
            cooldown: self.gate.remaining_cooldown(now).map(|d| d.num_seconds()),
            last_error: self.last_error.clone(),
            stats,
        }
    }
}

#[ractor::async_trait]
impl Actor for TrackerActor {
    type Msg = TrackerMsg;
    type State = TrackerState;
    type Arguments = (TrackerArgs, watch::Sender<Vec<Flight>>);

    #[tracing::instrument(skip(self, myself, args))]
    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let (args, out) = args;
        trace!(
            "tracker({}) starting on {}, credentials: {}",
            args.source.name(),
            args.area,
            args.source.is_authenticated()
        );

        // Anonymous rate until an answer says otherwise
        Ok(TrackerState {
            authenticated: false,
            gate: PollGate::new(&args.policy),
            source: args.source,
            area: args.area,
            policy: args.policy,
            tick: args.tick,
            max_extrapolation: args.max_extrapolation,
            flights: vec![],
            initial_loaded: false,
            running: false,
            last_error: None,
            poll_timer: None,
            tick_timer: None,
            start: Utc::now(),
            stats: Stats::default(),
            out,
        })
    }

    #[tracing::instrument(skip(self, myself, message, state))]
    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            TrackerMsg::Start => {
                if state.running {
                    trace!("already running");
                    return Ok(());
                }
                info!("tracking {} from {}", state.area, state.source.name());

                state.running = true;
                state.arm_poll(&myself);
                state.tick_timer = Some(myself.send_interval(state.tick, || TrackerMsg::Tick));
                myself.send_message(TrackerMsg::Poll)?;
            }
            TrackerMsg::Stop => {
                trace!("tracker::stop");

                state.running = false;
                state.disarm();
            }
            TrackerMsg::Poll => {
                if !state.running {
                    return Ok(());
                }
                let now = Utc::now();
                let key = state.area.key();
                match state.gate.check(now, key) {
                    Decision::Fetch => {
                        state.gate.begin();
                        state.stats.polls += 1;

                        let source = state.source.clone();
                        let area = state.area.clone();
                        let me = myself.clone();
                        tokio::spawn(async move {
                            let res = source.fetch(&area).await;
                            if me.send_message(TrackerMsg::Fetched(key, res)).is_err() {
                                trace!("tracker gone, result dropped");
                            }
                        });
                    }
                    Decision::RateLimited(left) => {
                        state.stats.skipped += 1;
                        info!("rate-limited, {}s before next poll", left.num_seconds());
                    }
                    d => {
                        state.stats.skipped += 1;
                        debug!("poll skipped: {d}");
                    }
                }
            }
            TrackerMsg::Fetched(key, res) => {
                let now = Utc::now();
                if !state.running {
                    // Stopped while the request was running
                    state.gate.failed();
                    debug!("stopped, fetch result dropped");
                    return Ok(());
                }
                match res {
                    Ok(poll) => {
                        let fresh = flights_from(&poll.list, now);
                        state.stats.flights += fresh.len() as u64;
                        state.flights = merge(fresh, &state.flights);
                        state.gate.succeeded(now, key);
                        state.initial_loaded = true;
                        state.last_error = None;

                        if poll.authenticated != state.authenticated {
                            info!("authenticated: {}", poll.authenticated);
                            state.authenticated = poll.authenticated;
                            state.arm_poll(&myself);
                        }
                        state.publish();

                        // Area changed while we were fetching
                        if key != state.area.key() {
                            myself.send_message(TrackerMsg::Poll)?;
                        }
                    }
                    Err(FetchError::RateLimited(retry)) => {
                        let wait = state.policy.backoff(retry);
                        state.gate.rate_limited(now, wait);
                        state.stats.limited += 1;
                        state.last_error = Some(FetchError::RateLimited(retry).to_string());
                        warn!("rate-limited, polling suspended for {}s", wait.num_seconds());
                    }
                    Err(e) => {
                        state.gate.failed();
                        state.stats.err += 1;
                        warn!("fetch failed: {e}");
                        state.last_error = Some(e.to_string());
                    }
                }
            }
            TrackerMsg::Tick => {
                if !state.running || !state.initial_loaded || state.flights.is_empty() {
                    return Ok(());
                }
                let now = Utc::now();
                let max = state.max_extrapolation;
                state.flights.iter_mut().for_each(|f| {
                    f.display = f.predict_at(now, max).normalized();
                });
                state.stats.ticks += 1;
                state.publish();
            }
            TrackerMsg::SetArea(area) => {
                info!("now watching {area}");

                state.area = area;
                if state.running {
                    myself.send_message(TrackerMsg::Poll)?;
                }
            }
            TrackerMsg::Snapshot(sender) => {
                sender.send(state.flights.clone())?;
            }
            TrackerMsg::Status(sender) => {
                sender.send(state.status(Utc::now()))?;
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.disarm();
        info!("tracker stopped: {}", state.status(Utc::now()).stats);
        Ok(())
    }
}
