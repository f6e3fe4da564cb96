//! Live access to the Opensky REST API.
//!
//! We only use `/states/all` with a bounding box.  Anonymous users get a handful of credits per
//! day, authenticated ones get a lot more, hence the two poll rates in `PollPolicy`.  When
//! credits are exhausted the server answers 429 and tells us how long to wait in
//! `X-Rate-Limit-Retry-After-Seconds`.
//!

use std::time::Duration;

use clap::{crate_name, crate_version};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use tracing::{debug, trace, warn};

use flightwatch_formats::StateList;

use crate::{Area, Auth, FetchError, Poll};

/// Default API endpoint
pub const OPENSKY_URL: &str = "https://opensky-network.org/api";

/// Seconds to wait before asking again
const RETRY_AFTER: &str = "x-rate-limit-retry-after-seconds";
/// Credits left
const REMAINING: &str = "x-rate-limit-remaining";

/// Client for the API.  Cloning is cheap, the `reqwest` client is shared.
///
#[derive(Clone, Debug)]
pub struct Opensky {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl Opensky {
    /// Create a client for `base_url` with a request `timeout`.
    ///
    #[tracing::instrument(skip(auth))]
    pub fn new(base_url: &str, auth: Auth, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate_name!(), crate_version!()))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Opensky {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch all state vectors inside the bounding box of `area`.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, area: &Area) -> Result<Poll, FetchError> {
        let url = format!("{}/states/all", self.base_url);
        let bb = area.bb();

        let req = self.client.get(&url).query(&[
            ("lamin", bb.min_lat),
            ("lomin", bb.min_lon),
            ("lamax", bb.max_lat),
            ("lomax", bb.max_lon),
        ]);
        let req = match &self.auth {
            Auth::Login { username, password } => req.basic_auth(username, Some(password)),
            Auth::Anon => req,
        };

        let resp = req
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        debug!("{:?}", &resp);

        match resp.status() {
            StatusCode::OK => {
                trace!("OK");
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry = retry_after(resp.headers());
                warn!("rate-limited, retry after {:?}s", retry);
                return Err(FetchError::RateLimited(retry));
            }
            code => {
                warn!("error({}): {:?}", code, resp.headers());
                return Err(FetchError::Status(code.as_u16()));
            }
        }

        if let Some(left) = resp.headers().get(REMAINING) {
            debug!("credits left: {:?}", left);
        }

        let buf = resp
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let list = StateList::from_json(&buf).map_err(|e| FetchError::Decode(e.to_string()))?;
        debug!("time={} {} states", list.time, list.len());

        Ok(Poll {
            list,
            authenticated: self.is_authenticated(),
        })
    }
}

/// Read the retry hint, in seconds, ignoring anything we can not parse.
///
fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
