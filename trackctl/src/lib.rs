//! Everything `trackctl` needs besides `main()`, split out so it can be tested.
//!

pub use cli::*;
pub use cmds::*;
pub use output::*;

mod cli;
mod cmds;
mod output;
