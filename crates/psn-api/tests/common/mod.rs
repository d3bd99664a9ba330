//! Shared fake PlayStation server setup for integration tests.

#![allow(dead_code)]

use chrono::Utc;
use psn_api::{ApiEndpoints, AuthEndpoints, PsnClient, PsnClientBuilder, TokenPair};
use psn_auth::TokenResponse;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const AUTHORIZE_PATH: &str = "/api/authz/v3/oauth/authorize";
pub const TOKEN_PATH: &str = "/api/authz/v3/oauth/token";

pub fn npsso() -> String {
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ01".to_string()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Builder pre-pointed at the fake server for both auth and resources
pub fn builder_for(server: &MockServer) -> PsnClientBuilder {
    init_tracing();
    let base = Url::parse(&server.uri()).unwrap();
    PsnClient::builder()
        .auth_endpoints(AuthEndpoints::with_base(&base).unwrap())
        .api_endpoints(ApiEndpoints::with_base(&base))
}

pub fn client_for(server: &MockServer) -> PsnClient {
    builder_for(server).build().unwrap()
}

pub fn token_json(access: &str, refresh: &str) -> serde_json::Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "expires_in": 3600,
        "refresh_token_expires_in": 5184000,
        "token_type": "bearer"
    })
}

/// Authorize redirect plus the authorization_code grant, each expected `times`
pub async fn mount_npsso_exchange(server: &MockServer, access: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(AUTHORIZE_PATH))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            "com.scee.psxandroid.scecompcall://redirect/?code=v3XYZ",
        ))
        .expect(times)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=v3XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(access, "R-npsso")))
        .expect(times)
        .mount(server)
        .await;
}

/// refresh_token grant answered with a new pair, expected `times`
pub async fn mount_refresh_grant(server: &MockServer, access: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(access, "R-refreshed")))
        .expect(times)
        .mount(server)
        .await;
}

fn pair(access: &str, issued_secs_ago: i64) -> TokenPair {
    let response: TokenResponse = serde_json::from_value(token_json(access, "R-old")).unwrap();
    TokenPair::from_response(response, Utc::now() - chrono::Duration::seconds(issued_secs_ago))
}

/// Pair whose access token expired an hour ago; its refresh token is still valid
pub fn expired_tokens(access: &str) -> TokenPair {
    pair(access, 7200)
}

pub fn fresh_tokens(access: &str) -> TokenPair {
    pair(access, 0)
}

/// Matches requests that do not carry `name`
pub struct NoHeader(pub &'static str);

impl wiremock::Match for NoHeader {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key(self.0)
    }
}
