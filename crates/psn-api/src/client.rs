use std::sync::Arc;
use std::time::Duration;

use psn_auth::{
    AuthConfig, AuthEndpoints, ClientApp, Context, HttpTimeouts, Npsso, TokenExchange, TokenPair,
    build_http_client,
};
use reqwest::ClientBuilder;
use tracing::{debug, instrument};

use crate::config::{ApiEndpoints, ClientConfig, Language, RefreshStrategy, Region, RetryPolicy};
use crate::errors::{PsnError, Result};
use crate::session::AuthenticatedSession;

/// Configured entry point to the PlayStation API.
///
/// Cheap to clone and safe to share: every clone and every session built
/// from it read the same immutable configuration and HTTP client.
#[derive(Debug, Clone)]
pub struct PsnClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: ClientConfig,
    http: reqwest::Client,
    exchange: TokenExchange,
}

impl PsnClient {
    /// Create a client from a complete configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, None)
    }

    pub fn builder() -> PsnClientBuilder {
        PsnClientBuilder::default()
    }

    fn with_transport(config: ClientConfig, transport: Option<ClientBuilder>) -> Result<Self> {
        let http = build_http_client(
            transport,
            &config.http_timeouts,
            config.user_agent.as_deref(),
        )
        .map_err(PsnError::InvalidTransport)?;

        let exchange = TokenExchange::new(config.auth.clone(), http.clone());

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                http,
                exchange,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn region(&self) -> Region {
        self.inner.config.region
    }

    pub fn language(&self) -> Option<Language> {
        self.inner.config.language
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub(crate) fn exchange(&self) -> &TokenExchange {
        &self.inner.exchange
    }

    /// Validate `npsso` and exchange it for a token pair.
    ///
    /// The returned session keeps the npsso so it can re-run the exchange
    /// when its tokens can no longer be refreshed.
    #[instrument(skip(self, ctx, npsso))]
    pub async fn authenticate(&self, ctx: &Context, npsso: &str) -> Result<AuthenticatedSession> {
        let npsso = Npsso::new(npsso)?;

        debug!("Authenticating with npsso");
        let tokens = self.inner.exchange.exchange(ctx, &npsso).await?;

        Ok(AuthenticatedSession::new(self.clone(), npsso, tokens))
    }

    /// Rebuild a session around a token pair obtained earlier in this process
    pub fn session_from_tokens(&self, npsso: &str, tokens: TokenPair) -> Result<AuthenticatedSession> {
        let npsso = Npsso::new(npsso)?;
        Ok(AuthenticatedSession::new(self.clone(), npsso, tokens))
    }
}

/// Builder for [`PsnClient`].
///
/// Tag setters validate eagerly and fail before any network activity.
#[derive(Debug, Default)]
pub struct PsnClientBuilder {
    config: ClientConfig,
    transport: Option<ClientBuilder>,
}

impl PsnClientBuilder {
    /// Set the region from a tag such as `"gb"`
    pub fn region(mut self, tag: &str) -> Result<Self> {
        self.config.region = tag.parse()?;
        Ok(self)
    }

    /// Set the `Accept-Language` from a tag such as `"en-GB"`
    pub fn language(mut self, tag: &str) -> Result<Self> {
        self.config.language = Some(tag.parse()?);
        Ok(self)
    }

    pub fn region_tag(mut self, region: Region) -> Self {
        self.config.region = region;
        self
    }

    pub fn language_tag(mut self, language: Language) -> Self {
        self.config.language = Some(language);
        self
    }

    /// Send requests without an `Accept-Language` header
    pub fn without_language(mut self) -> Self {
        self.config.language = None;
        self
    }

    /// Base the transport on a custom reqwest builder.
    ///
    /// Redirect following is switched off on it regardless of its settings.
    pub fn transport(mut self, builder: ClientBuilder) -> Self {
        self.transport = Some(builder);
        self
    }

    pub fn timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.config.http_timeouts = HttpTimeouts { connect, request };
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn refresh_strategy(mut self, strategy: RefreshStrategy) -> Self {
        self.config.refresh_strategy = strategy;
        self
    }

    pub fn client_app(mut self, app: ClientApp) -> Self {
        self.config.auth.client_app = app;
        self
    }

    pub fn auth_endpoints(mut self, endpoints: AuthEndpoints) -> Self {
        self.config.auth.endpoints = endpoints;
        self
    }

    pub fn api_endpoints(mut self, endpoints: ApiEndpoints) -> Self {
        self.config.api = endpoints;
        self
    }

    pub fn auth_config(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    pub fn build(self) -> Result<PsnClient> {
        PsnClient::with_transport(self.config, self.transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psn_auth::{AuthError, CredentialError};

    #[test]
    fn test_builder_applies_tags() {
        let client = PsnClient::builder()
            .region("jp")
            .unwrap()
            .language("ja-JP")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(client.region(), Region::Japan);
        assert_eq!(client.language(), Some(Language::Japanese));
    }

    #[test]
    fn test_builder_rejects_unknown_region() {
        let result = PsnClient::builder().region("atlantis");
        assert!(matches!(result, Err(PsnError::UnsupportedRegion(_))));
    }

    #[test]
    fn test_builder_rejects_unknown_language() {
        let result = PsnClient::builder().language("xx-XX");
        assert!(matches!(result, Err(PsnError::UnsupportedLanguage(_))));
    }

    #[test]
    fn test_without_language() {
        let client = PsnClient::builder().without_language().build().unwrap();
        assert_eq!(client.language(), None);
    }

    #[test]
    fn test_custom_transport_is_accepted() {
        let client = PsnClient::builder()
            .transport(reqwest::Client::builder().pool_max_idle_per_host(1))
            .build();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_npsso_before_network() {
        let client = PsnClient::new(ClientConfig::default()).unwrap();

        let result = client.authenticate(&Context::background(), "").await;
        assert!(matches!(
            result,
            Err(PsnError::Auth(AuthError::InvalidCredential(CredentialError::Empty)))
        ));

        let result = client.authenticate(&Context::background(), "short").await;
        assert!(matches!(
            result,
            Err(PsnError::Auth(AuthError::InvalidCredential(
                CredentialError::WrongLength { len: 5 }
            )))
        ));
    }
}
