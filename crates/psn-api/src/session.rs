use psn_auth::{AccessToken, Context, Npsso, TokenPair};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, RETRY_AFTER};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::client::PsnClient;
use crate::config::RefreshStrategy;
use crate::errors::{PsnError, Result};
use crate::models::RequestError;
use crate::retry::backoff_delay;

/// An authenticated connection to the PlayStation API.
///
/// Expiry is checked lazily before every request; an expired access token
/// is renewed first and the new pair replaces the old one only once the
/// renewal fully succeeds. The check and the renewal run under one lock, so
/// concurrent callers sharing a session trigger a single refresh.
#[derive(Debug)]
pub struct AuthenticatedSession {
    client: PsnClient,
    npsso: Npsso,
    tokens: Mutex<TokenPair>,
}

impl AuthenticatedSession {
    pub(crate) fn new(client: PsnClient, npsso: Npsso, tokens: TokenPair) -> Self {
        Self {
            client,
            npsso,
            tokens: Mutex::new(tokens),
        }
    }

    pub fn client(&self) -> &PsnClient {
        &self.client
    }

    /// Snapshot of the current token pair
    pub async fn tokens(&self) -> TokenPair {
        self.tokens.lock().await.clone()
    }

    /// Renew the token pair now, whether or not it has expired
    #[instrument(skip(self, ctx))]
    pub async fn refresh(&self, ctx: &Context) -> Result<()> {
        let mut tokens = ctx.run(self.tokens.lock()).await?;
        let renewed = self.renew(ctx, &tokens).await?;
        *tokens = renewed;
        Ok(())
    }

    /// Current access token, renewing the pair first if it has expired
    async fn access_token(&self, ctx: &Context) -> Result<AccessToken> {
        let mut tokens = ctx.run(self.tokens.lock()).await?;

        if !tokens.is_authenticated() {
            return Err(PsnError::Unauthenticated);
        }

        if tokens.is_access_expired() {
            debug!(expired_at = %tokens.access_expires_at, "Access token expired, refreshing");
            let renewed = self.renew(ctx, &tokens).await?;
            *tokens = renewed;
        }

        Ok(tokens.access_token.clone())
    }

    async fn renew(&self, ctx: &Context, current: &TokenPair) -> Result<TokenPair> {
        let exchange = self.client.exchange();

        let result = match self.client.config().refresh_strategy {
            RefreshStrategy::FullReexchange => exchange.exchange(ctx, &self.npsso).await,
            RefreshStrategy::RefreshToken => match exchange.refresh(ctx, current).await {
                Ok(tokens) => Ok(tokens),
                Err(psn_auth::AuthError::Cancelled) => Err(psn_auth::AuthError::Cancelled),
                Err(e) => {
                    warn!("Refresh grant failed, re-running npsso exchange: {}", e);
                    exchange.exchange(ctx, &self.npsso).await
                }
            },
        };

        result.map_err(PsnError::refresh)
    }

    /// GET `url` and return the body for decoding.
    ///
    /// 401 and 403 bodies are handed back rather than failed: the API puts
    /// its error envelope in them and the decoding step surfaces it.
    #[instrument(skip(self, ctx, url), fields(url = %url))]
    pub async fn request(&self, ctx: &Context, url: Url) -> Result<String> {
        let policy = &self.client.config().retry;
        let mut attempt = 0;

        loop {
            let error = match self.request_once(ctx, url.clone()).await {
                Ok(body) => return Ok(body),
                Err(e) => e,
            };

            if attempt >= policy.max_retries || !error.is_retryable() {
                return Err(error);
            }

            let mut delay = backoff_delay(policy, attempt);
            if let PsnError::RateLimited {
                retry_after: Some(secs),
            } = &error
            {
                delay = delay.max(std::time::Duration::from_secs(*secs));
            }

            if ctx.remaining().is_some_and(|left| left <= delay) {
                return Err(error);
            }

            attempt += 1;
            warn!(
                attempt,
                max_retries = policy.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Request failed: {}. Retrying",
                error
            );
            ctx.run(tokio::time::sleep(delay)).await?;
        }
    }

    async fn request_once(&self, ctx: &Context, url: Url) -> Result<String> {
        let access_token = self.access_token(ctx).await?;

        let mut request = self
            .client
            .http()
            .get(url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", access_token.as_str()))
            .header(ACCEPT, "application/json");

        if let Some(language) = self.client.language() {
            request = request.header(ACCEPT_LANGUAGE, language.as_str());
        }

        let response = ctx.run(request.send()).await??;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = ctx.run(response.text()).await??;

        match status {
            StatusCode::OK => Ok(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(%status, "Passing error body through for decoding");
                Ok(body)
            }
            StatusCode::NOT_FOUND => Err(PsnError::NotFound {
                url: url.to_string(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(PsnError::RateLimited { retry_after }),
            status => Err(PsnError::UnexpectedStatus { status, body }),
        }
    }

    /// GET `url` and decode the body into `T`, surfacing the API's error envelope
    pub async fn request_and_decode<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: Url,
    ) -> Result<T> {
        let body = self.request(ctx, url).await?;
        decode(&body)
    }
}

/// Decode a body, failing with the envelope's message if its code is set
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: RequestError =
        serde_json::from_str(body).map_err(|e| PsnError::malformed(e, body))?;

    if envelope.error.code != 0 {
        return Err(PsnError::RemoteError {
            code: envelope.error.code,
            message: envelope.error.message,
            reason: envelope.error.reason,
            reference_id: envelope.error.reference_id,
        });
    }

    serde_json::from_str(body).map_err(|e| PsnError::malformed(e, body))
}
