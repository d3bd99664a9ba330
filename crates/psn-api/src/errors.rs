use psn_auth::AuthError;
use thiserror::Error;

/// PlayStation API client error types
#[derive(Error, Debug)]
pub enum PsnError {
    #[error("Authentication failed: {0}")]
    Auth(#[source] AuthError),

    #[error("Error refreshing tokens: {0}")]
    RefreshFailed(#[source] AuthError),

    #[error("Invalid tokens: access token is required")]
    Unauthenticated,

    #[error("Request error {code}: {message}")]
    RemoteError {
        code: i64,
        message: String,
        reason: String,
        reference_id: String,
    },

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    #[error("Unexpected status code {status}: {body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Error decoding response: {source}, body: {body_snippet}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        body_snippet: String,
    },

    #[error("Request cancelled or deadline exceeded")]
    Cancelled,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Unsupported region {0}")]
    UnsupportedRegion(String),

    #[error("Unsupported language {0}")]
    UnsupportedLanguage(String),

    #[error("Cannot build HTTP transport: {0}")]
    InvalidTransport(#[source] reqwest::Error),
}

impl PsnError {
    /// Transient failures a bounded retry may recover from
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::UnexpectedStatus { status, .. } => status.is_server_error(),
            Self::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// Map a failed lazy refresh; cancellation stays cancellation
    pub(crate) fn refresh(err: AuthError) -> Self {
        match err {
            AuthError::Cancelled => Self::Cancelled,
            err => Self::RefreshFailed(err),
        }
    }

    pub(crate) fn malformed(source: serde_json::Error, body: &str) -> Self {
        Self::MalformedResponse {
            source,
            body_snippet: body.chars().take(200).collect(),
        }
    }
}

impl From<AuthError> for PsnError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Cancelled => Self::Cancelled,
            err => Self::Auth(err),
        }
    }
}

impl From<psn_auth::CredentialError> for PsnError {
    fn from(err: psn_auth::CredentialError) -> Self {
        Self::Auth(AuthError::InvalidCredential(err))
    }
}

impl From<psn_auth::Cancelled> for PsnError {
    fn from(_: psn_auth::Cancelled) -> Self {
        Self::Cancelled
    }
}

pub type Result<T> = std::result::Result<T, PsnError>;
