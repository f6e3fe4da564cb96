//! Replay of recorded API answers.
//!
//! The file has one `/states/all` answer per line (JSON lines), e.g. saved with `curl`.  Every
//! fetch returns the next frame, looping at the end, restricted to the requested area as the
//! server would do.
//!

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use eyre::Result;
use tracing::{debug, trace, warn};

use flightwatch_formats::StateList;

use crate::{Area, FetchError, Poll};

#[derive(Clone, Debug)]
pub struct Replay {
    frames: Arc<Vec<StateList>>,
    cursor: Arc<AtomicUsize>,
    authenticated: bool,
}

impl Replay {
    pub fn new(frames: Vec<StateList>) -> Self {
        Replay {
            frames: Arc::new(frames),
            cursor: Arc::new(AtomicUsize::new(0)),
            authenticated: false,
        }
    }

    /// Load frames from a JSON lines file.  Empty lines and lines we can not decode are skipped.
    ///
    #[tracing::instrument]
    pub fn from_file(fname: &Path) -> Result<Self> {
        let data = fs::read_to_string(fname)?;
        Ok(Self::from_lines(&data))
    }

    pub fn from_lines(data: &str) -> Self {
        let frames: Vec<StateList> = data
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match StateList::from_json(line) {
                Ok(sl) => Some(sl),
                Err(e) => {
                    warn!("line {}: {}", n + 1, e);
                    None
                }
            })
            .collect();
        debug!("{} frames", frames.len());
        Self::new(frames)
    }

    /// Pretend the frames were obtained with credentials.
    ///
    pub fn authenticated(mut self, yes: bool) -> Self {
        self.authenticated = yes;
        self
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Next frame, with only the vectors inside `area`.  Vectors without a position are kept,
    /// the server does the same.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, area: &Area) -> Result<Poll, FetchError> {
        if self.frames.is_empty() {
            return Err(FetchError::Empty);
        }
        let n = self.cursor.fetch_add(1, Ordering::Relaxed) % self.frames.len();
        trace!("frame {n}");

        let frame = &self.frames[n];
        let bb = area.bb();
        let states = frame.states.as_ref().map(|all| {
            all.iter()
                .filter(|sv| match (sv.latitude, sv.longitude) {
                    (Some(lat), Some(lon)) => bb.contains(lat, lon),
                    _ => true,
                })
                .cloned()
                .collect()
        });

        Ok(Poll {
            list: StateList {
                time: frame.time,
                states,
            },
            authenticated: self.authenticated,
        })
    }
}
