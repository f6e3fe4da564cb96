//! Merge a fresh poll result into what is currently displayed.
//!
//! New data never makes an aircraft jump on screen: a known aircraft keeps its displayed position
//! and only gets a new anchor, the next prediction tick moves it from there.  Aircraft missing
//! from the fresh list are gone.
//!

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::Flight;

/// Combine `fresh` with `current`, in the order of `fresh`.  An aircraft listed twice in `fresh`
/// keeps its first place and the data of its last entry.
///
#[tracing::instrument(skip(fresh, current))]
pub fn merge(fresh: Vec<Flight>, current: &[Flight]) -> Vec<Flight> {
    let shown: HashMap<&str, &Flight> = current.iter().map(|f| (f.icao24.as_str(), f)).collect();

    let mut merged: Vec<Flight> = Vec::with_capacity(fresh.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(fresh.len());

    for mut f in fresh {
        // `actual` is already the raw fresh position
        f.display = match shown.get(f.icao24.as_str()) {
            Some(old) => {
                trace!("{}: keep display at {}", f.icao24, old.display);
                old.display
            }
            None => f.actual,
        };
        match index.get(&f.icao24) {
            Some(&i) => {
                debug!("{}: duplicate in poll, last one wins", f.icao24);
                merged[i] = f;
            }
            None => {
                index.insert(f.icao24.clone(), merged.len());
                merged.push(f);
            }
        }
    }

    debug!("merged {} fresh with {} shown", merged.len(), current.len());
    merged
}
