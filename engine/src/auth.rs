//! Credentials for the upstream API.
//!

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// How we access the API.
///
/// Anonymous access works but gets far fewer credits, so we poll less often.  In the
/// configuration file, `Login` is just:
///
/// ```hcl
/// auth {
///   username = "me"
///   password = "secret"
/// }
/// ```
///
/// ```rust
/// use flightwatch_engine::Auth;
///
/// let auth = Auth::Login {
///     username: "me".to_string(),
///     password: "secret".to_string(),
/// };
///
/// assert!(auth.to_string().contains("HIDDEN"));
/// ```
///
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Auth {
    /// Nothing special, no auth
    #[default]
    Anon,
    /// Using plain login/password
    Login { username: String, password: String },
}

impl Auth {
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Auth::Login { .. })
    }
}

impl Display for Auth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Never show the password
        //
        match self {
            Auth::Anon => write!(f, "Anon"),
            Auth::Login { username, .. } => {
                write!(f, "Login {{ username: {username}, password: HIDDEN }}")
            }
        }
    }
}
