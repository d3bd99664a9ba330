use chrono::Utc;
use reqwest::header::{AUTHORIZATION, COOKIE, LOCATION};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::config::{AuthConfig, CODE_PREFIX};
use crate::context::Context;
use crate::credential::Npsso;
use crate::errors::{AuthError, Result, snippet};
use crate::models::TokenResponse;
use crate::tokens::TokenPair;

/// Exchanges an npsso for tokens through the v3 OAuth endpoints
#[derive(Debug, Clone)]
pub struct TokenExchange {
    config: AuthConfig,
    http: Client,
}

impl TokenExchange {
    /// `http` must not follow redirects, see [`crate::transport::build_http_client`]
    pub fn new(config: AuthConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Full npsso exchange: authorize for a code, then trade the code for tokens
    #[instrument(skip(self, ctx, npsso))]
    pub async fn exchange(&self, ctx: &Context, npsso: &Npsso) -> Result<TokenPair> {
        debug!("Starting npsso exchange");
        let code = self.authorize(ctx, npsso).await?;
        self.exchange_code(ctx, &code).await
    }

    /// Ask the authorize endpoint for an offline-access code.
    ///
    /// The endpoint answers 302 with the code in the `Location` query.
    #[instrument(skip(self, ctx, npsso))]
    pub async fn authorize(&self, ctx: &Context, npsso: &Npsso) -> Result<String> {
        let app = &self.config.client_app;
        let mut url = self.config.endpoints.authorize.clone();
        url.query_pairs_mut()
            .append_pair("access_type", "offline")
            .append_pair("client_id", &app.client_id)
            .append_pair("response_type", "code")
            .append_pair("scope", &app.scope)
            .append_pair("redirect_uri", &app.redirect_uri);

        debug!("Requesting authorization code");
        let request = self.http.get(url).header(COOKIE, npsso.cookie()).send();
        let response = ctx.run(request).await??;
        ctx.check()?;

        if response.status() != StatusCode::FOUND {
            return Err(AuthError::authorization(format!(
                "expected 302 from authorize endpoint, got {}",
                response.status()
            )));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AuthError::authorization("missing Location header"))?;

        let location = response
            .url()
            .join(location)
            .map_err(|e| AuthError::authorization(format!("unparseable Location: {e}")))?;

        let code = location
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();

        if !code.starts_with(CODE_PREFIX) {
            return Err(AuthError::authorization("redirect carried no v3 code"));
        }

        Ok(code)
    }

    /// Trade an authorization code for a token pair
    #[instrument(skip(self, ctx, code))]
    pub async fn exchange_code(&self, ctx: &Context, code: &str) -> Result<TokenPair> {
        let app = &self.config.client_app;
        let form = [
            ("code", code),
            ("redirect_uri", app.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("token_format", app.token_format.as_str()),
        ];

        debug!("Exchanging authorization code for tokens");
        self.request_token(ctx, &form).await
    }

    /// Obtain a new pair with the refresh_token grant.
    ///
    /// An expired refresh token is rejected without a request.
    #[instrument(skip(self, ctx, tokens))]
    pub async fn refresh(&self, ctx: &Context, tokens: &TokenPair) -> Result<TokenPair> {
        if tokens.refresh_token.is_empty() || tokens.is_refresh_expired() {
            return Err(AuthError::RefreshTokenExpired);
        }

        let app = &self.config.client_app;
        let form = [
            ("refresh_token", tokens.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
            ("scope", app.scope.as_str()),
            ("token_format", app.token_format.as_str()),
        ];

        debug!("Refreshing access token");
        self.request_token(ctx, &form).await
    }

    async fn request_token(&self, ctx: &Context, form: &[(&str, &str)]) -> Result<TokenPair> {
        let request = self
            .http
            .post(self.config.endpoints.token.clone())
            .header(AUTHORIZATION, self.config.client_app.basic_auth())
            .form(form)
            .send();

        let response = ctx.run(request).await??;
        ctx.check()?;

        let status = response.status();
        let body = ctx.run(response.text()).await??;
        ctx.check()?;

        if status != StatusCode::OK {
            return Err(AuthError::TokenExchangeFailed {
                status,
                body_snippet: snippet(&body),
            });
        }

        let token_response: TokenResponse =
            serde_json::from_str(&body).map_err(AuthError::MalformedTokenResponse)?;

        let tokens = TokenPair::from_response(token_response, Utc::now());
        debug!(
            access_expires_at = %tokens.access_expires_at,
            refresh_expires_at = %tokens.refresh_expires_at,
            "Obtained token pair"
        );
        Ok(tokens)
    }
}
