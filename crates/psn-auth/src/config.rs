use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use url::Url;

/// Sony account OAuth endpoints
pub mod endpoints {
    pub const AUTHORIZE: &str = "https://ca.account.sony.com/api/authz/v3/oauth/authorize";
    pub const TOKEN: &str = "https://ca.account.sony.com/api/authz/v3/oauth/token";
}

/// Values registered for the official PlayStation mobile app
pub mod playstation_app {
    pub const CLIENT_ID: &str = "09515159-7237-4370-9b40-3806e67c0891";
    pub const CLIENT_SECRET: &str = "ucPjka5tntB2KqsP";
    pub const REDIRECT_URI: &str = "com.scee.psxandroid.scecompcall://redirect";
    pub const SCOPE: &str = "psn:mobile.v2.core psn:clientapp";
    pub const TOKEN_FORMAT: &str = "jwt";
}

/// Prefix every authorization code issued by the v3 endpoint carries
pub const CODE_PREFIX: &str = "v3";

/// Required npsso length in bytes
pub const NPSSO_LEN: usize = 64;

/// Default user agent for every request
pub const USER_AGENT: &str = concat!("psn-client/", env!("CARGO_PKG_VERSION"));

/// HTTP client timeouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            request: Duration::from_secs(30),
        }
    }
}

/// OAuth client application the token exchange identifies as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientApp {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub token_format: String,
}

impl ClientApp {
    /// The official PlayStation app identity
    pub fn playstation_app() -> Self {
        Self {
            client_id: playstation_app::CLIENT_ID.to_string(),
            client_secret: playstation_app::CLIENT_SECRET.to_string(),
            redirect_uri: playstation_app::REDIRECT_URI.to_string(),
            scope: playstation_app::SCOPE.to_string(),
            token_format: playstation_app::TOKEN_FORMAT.to_string(),
        }
    }

    /// Value of the `Authorization` header sent to the token endpoint
    pub fn basic_auth(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(pair))
    }
}

impl Default for ClientApp {
    fn default() -> Self {
        Self::playstation_app()
    }
}

/// Authorization and token endpoint locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub authorize: Url,
    pub token: Url,
}

impl AuthEndpoints {
    /// Point both endpoints at `base`, keeping the upstream paths.
    ///
    /// Used to aim the exchange at a fake server.
    pub fn with_base(base: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            authorize: base.join("/api/authz/v3/oauth/authorize")?,
            token: base.join("/api/authz/v3/oauth/token")?,
        })
    }
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            authorize: Url::parse(endpoints::AUTHORIZE).expect("valid authorize URL"),
            token: Url::parse(endpoints::TOKEN).expect("valid token URL"),
        }
    }
}

/// Configuration for the token exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    pub client_app: ClientApp,
    pub endpoints: AuthEndpoints,
}
