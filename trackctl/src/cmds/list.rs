use eyre::Result;
use tracing::info;

use flightwatch_common::{list_locations, load_locations};

use crate::{ListOpts, ListSubCommand};

#[tracing::instrument]
pub fn list(opts: &ListOpts) -> Result<String> {
    match opts.cmd {
        ListSubCommand::Locations => {
            info!("Listing all locations:");

            let all = load_locations(opts.locations.as_deref())?;
            Ok(list_locations(&all, opts.radius))
        }
    }
}
