//! Small helper macros shared by all crates.
//!

/// Build a `PathBuf` from a list of components.
///
/// ```rust
/// use std::path::PathBuf;
/// use flightwatch_common::makepath;
///
/// let p: PathBuf = makepath!("/home", "foo", ".config");
/// assert_eq!(PathBuf::from("/home/foo/.config"), p);
/// ```
///
#[macro_export]
macro_rules! makepath {
    ($($item:expr),+) => {
        [
        $(::std::path::PathBuf::from($item),)+
        ]
        .iter()
        .collect::<::std::path::PathBuf>()
    };
}
