pub use list::*;
pub use predict::*;
pub use track::*;

mod list;
mod predict;
mod track;
