//! `Tracker` is the public face of the tracking engine.
//!
//! It spawns a `TrackerActor` and talks to it.  Consumers either ask for a `snapshot()` from
//! time to time or `subscribe()` to get every update (after each merge & each prediction tick).
//!
//! ```no_run
//! # async fn run() -> eyre::Result<()> {
//! use flightwatch_common::Location;
//! use flightwatch_engine::{Area, Tracker, TrackerArgs, TrackerConfig};
//!
//! let cfg = TrackerConfig::default();
//! let area = Area::new(Location::new(50.9, 4.48), 25);
//! let tracker = Tracker::start(TrackerArgs::new(cfg.opensky()?, area)).await?;
//!
//! let mut rx = tracker.subscribe();
//! rx.changed().await?;
//! println!("{} flights", rx.borrow().len());
//!
//! let stats = tracker.stop().await?;
//! # Ok(())
//! # }
//! ```
//!

use ractor::concurrency::JoinHandle;
use ractor::{call, cast, Actor, ActorRef};
use tokio::sync::watch;
use tracing::trace;

pub use actor::*;

use crate::{Area, Flight, Stats, TrackerError};

mod actor;

pub struct Tracker {
    actor: ActorRef<TrackerMsg>,
    handle: JoinHandle<()>,
    rx: watch::Receiver<Vec<Flight>>,
}

impl Tracker {
    /// Spawn the actor and start polling.
    ///
    #[tracing::instrument]
    pub async fn start(args: TrackerArgs) -> Result<Self, TrackerError> {
        args.validate()?;
        let (tx, rx) = watch::channel(vec![]);

        let (actor, handle) = Actor::spawn(None, TrackerActor, (args, tx))
            .await
            .map_err(|e| TrackerError::Spawn(e.to_string()))?;
        cast!(actor, TrackerMsg::Start).map_err(|e| TrackerError::Rpc(e.to_string()))?;

        Ok(Tracker { actor, handle, rx })
    }

    /// Stop the timers, shut the actor down and return the final stats.  A fetch still running
    /// is left to finish and its result ignored.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn stop(self) -> Result<Stats, TrackerError> {
        cast!(self.actor, TrackerMsg::Stop).map_err(|e| TrackerError::Rpc(e.to_string()))?;
        let status = call!(self.actor, TrackerMsg::Status)
            .map_err(|e| TrackerError::Rpc(e.to_string()))?;

        self.actor.stop(None);
        self.handle
            .await
            .map_err(|e| TrackerError::Rpc(e.to_string()))?;
        trace!("tracker gone");
        Ok(status.stats)
    }

    /// Current flights with their displayed positions.
    ///
    pub async fn snapshot(&self) -> Result<Vec<Flight>, TrackerError> {
        call!(self.actor, TrackerMsg::Snapshot).map_err(|e| TrackerError::Rpc(e.to_string()))
    }

    pub async fn status(&self) -> Result<TrackerStatus, TrackerError> {
        call!(self.actor, TrackerMsg::Status).map_err(|e| TrackerError::Rpc(e.to_string()))
    }

    /// Get every published update.
    ///
    pub fn subscribe(&self) -> watch::Receiver<Vec<Flight>> {
        self.rx.clone()
    }

    /// Watch another area, polling it as soon as possible.
    ///
    pub fn set_area(&self, area: Area) -> Result<(), TrackerError> {
        cast!(self.actor, TrackerMsg::SetArea(area)).map_err(|e| TrackerError::Rpc(e.to_string()))
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("actor", &self.actor.get_id())
            .finish()
    }
}
