use thiserror::Error;

/// PSN authentication error types
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid npsso: {0}")]
    InvalidCredential(#[from] CredentialError),

    #[error("Authorization failed ({reason}) - check npsso")]
    AuthorizationFailed { reason: String },

    #[error("Unable to obtain authentication token, HTTP {status}: {body_snippet}")]
    TokenExchangeFailed {
        status: reqwest::StatusCode,
        body_snippet: String,
    },

    #[error("Malformed token response: {0}")]
    MalformedTokenResponse(#[source] serde_json::Error),

    #[error("Refresh token has expired - a new npsso exchange is required")]
    RefreshTokenExpired,

    #[error("Request cancelled or deadline exceeded")]
    Cancelled,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl AuthError {
    pub(crate) fn authorization(reason: impl Into<String>) -> Self {
        Self::AuthorizationFailed {
            reason: reason.into(),
        }
    }
}

/// Shape errors for the npsso session credential
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    #[error("npsso is empty")]
    Empty,

    #[error("npsso must be exactly 64 bytes long, got {len}")]
    WrongLength { len: usize },
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Truncate a response body for inclusion in an error message
pub(crate) fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
