use std::fmt;

use chrono::{DateTime, Duration, Utc};
use zeroize::Zeroizing;

use crate::models::TokenResponse;

/// Bearer token for resource requests. Never shown in Debug output.
#[derive(Clone, Default)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Raw value, for building the `Authorization` header only
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// Token for the refresh_token grant. Never shown in Debug output.
#[derive(Clone, Default)]
pub struct RefreshToken(Zeroizing<String>);

impl RefreshToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// Access and refresh tokens with their lifetimes and derived expiry instants.
///
/// The default value has an empty access token and counts as unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    /// Access token lifetime in seconds, as returned by the server
    pub access_expires_in: u64,
    /// Refresh token lifetime in seconds, as returned by the server
    pub refresh_expires_in: u64,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Build a pair from a token response completed at `issued_at`
    pub fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        Self {
            access_token: AccessToken::new(response.access_token),
            refresh_token: RefreshToken::new(response.refresh_token),
            access_expires_in: response.expires_in,
            refresh_expires_in: response.refresh_token_expires_in,
            access_expires_at: expires_at(issued_at, response.expires_in),
            refresh_expires_at: expires_at(issued_at, response.refresh_token_expires_in),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// True once the access expiry instant is strictly in the past
    pub fn is_access_expired(&self) -> bool {
        self.access_expires_at < Utc::now()
    }

    pub fn is_refresh_expired(&self) -> bool {
        self.refresh_expires_at < Utc::now()
    }

    /// True when the access token expires within `skew` from now
    pub fn expires_within(&self, skew: Duration) -> bool {
        Utc::now()
            .checked_add_signed(skew)
            .is_none_or(|limit| self.access_expires_at < limit)
    }
}

/// `issued_at + secs`, saturating at the latest representable instant
fn expires_at(issued_at: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
