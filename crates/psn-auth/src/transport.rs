use reqwest::{Client, ClientBuilder, redirect};

use crate::config::{HttpTimeouts, USER_AGENT};

/// Build the HTTP client used for every request.
///
/// Redirect following is always switched off so the authorize step can read
/// the `Location` header of the 302 itself. A caller-supplied `builder`
/// keeps its other settings.
pub fn build_http_client(
    builder: Option<ClientBuilder>,
    timeouts: &HttpTimeouts,
    user_agent: Option<&str>,
) -> reqwest::Result<Client> {
    builder
        .unwrap_or_default()
        .redirect(redirect::Policy::none())
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.request)
        .user_agent(user_agent.unwrap_or(USER_AGENT))
        .build()
}
