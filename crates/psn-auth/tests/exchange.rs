//! Token exchange tests against a fake Sony account server.

use std::time::Duration;

use chrono::Utc;
use psn_auth::{
    AuthConfig, AuthEndpoints, AuthError, ClientApp, Context, HttpTimeouts, Npsso, TokenExchange,
    build_http_client,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTHORIZE_PATH: &str = "/api/authz/v3/oauth/authorize";
const TOKEN_PATH: &str = "/api/authz/v3/oauth/token";

fn npsso() -> Npsso {
    Npsso::new("n".repeat(64)).unwrap()
}

fn exchange_for(server: &MockServer) -> TokenExchange {
    let base = Url::parse(&server.uri()).unwrap();
    let config = AuthConfig {
        client_app: ClientApp::playstation_app(),
        endpoints: AuthEndpoints::with_base(&base).unwrap(),
    };
    let http = build_http_client(None, &HttpTimeouts::default(), None).unwrap();
    TokenExchange::new(config, http)
}

fn token_body() -> serde_json::Value {
    json!({
        "access_token": "A",
        "refresh_token": "B",
        "expires_in": 3600,
        "refresh_token_expires_in": 5184000,
        "token_type": "bearer",
        "scope": "psn:mobile.v2.core psn:clientapp"
    })
}

async fn mount_redirect(server: &MockServer, location: &str) {
    Mock::given(method("GET"))
        .and(path(AUTHORIZE_PATH))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", location))
        .mount(server)
        .await;
}

// ============================================================================
// Authorization step
// ============================================================================

#[tokio::test]
async fn test_exchange_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(AUTHORIZE_PATH))
        .and(query_param("access_type", "offline"))
        .and(query_param("client_id", "09515159-7237-4370-9b40-3806e67c0891"))
        .and(query_param("response_type", "code"))
        .and(query_param("scope", "psn:mobile.v2.core psn:clientapp"))
        .and(query_param(
            "redirect_uri",
            "com.scee.psxandroid.scecompcall://redirect",
        ))
        .and(header("cookie", format!("npsso={}", "n".repeat(64)).as_str()))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            "com.scee.psxandroid.scecompcall://redirect/?code=v3abc&cid=1",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header(
            "authorization",
            "Basic MDk1MTUxNTktNzIzNy00MzcwLTliNDAtMzgwNmU2N2MwODkxOnVjUGprYTV0bnRCMktxc1A=",
        ))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("code=v3abc"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("token_format=jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let before = Utc::now();
    let tokens = exchange_for(&server)
        .exchange(&Context::background(), &npsso())
        .await
        .unwrap();
    let after = Utc::now();

    assert_eq!(tokens.access_token.as_str(), "A");
    assert_eq!(tokens.refresh_token.as_str(), "B");
    assert_eq!(tokens.access_expires_in, 3600);
    assert_eq!(tokens.refresh_expires_in, 5_184_000);

    let access = chrono::Duration::seconds(3600);
    let refresh = chrono::Duration::seconds(5_184_000);
    assert!(tokens.access_expires_at >= before + access);
    assert!(tokens.access_expires_at <= after + access);
    assert!(tokens.refresh_expires_at >= before + refresh);
    assert!(tokens.refresh_expires_at <= after + refresh);
}

#[tokio::test]
async fn test_authorize_extracts_code_from_location() {
    let server = MockServer::start().await;
    mount_redirect(&server, "https://example.invalid/cb?code=v3abc").await;

    let code = exchange_for(&server)
        .authorize(&Context::background(), &npsso())
        .await
        .unwrap();

    assert_eq!(code, "v3abc");
}

#[tokio::test]
async fn test_code_without_v3_prefix_fails() {
    let server = MockServer::start().await;
    mount_redirect(&server, "https://example.invalid/cb?code=v2abc").await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(0)
        .mount(&server)
        .await;

    let result = exchange_for(&server)
        .exchange(&Context::background(), &npsso())
        .await;

    assert!(matches!(result, Err(AuthError::AuthorizationFailed { .. })));
}

#[tokio::test]
async fn test_missing_code_fails() {
    let server = MockServer::start().await;
    mount_redirect(&server, "https://example.invalid/cb?error=login_required").await;

    let result = exchange_for(&server)
        .authorize(&Context::background(), &npsso())
        .await;

    assert!(matches!(result, Err(AuthError::AuthorizationFailed { .. })));
}

#[tokio::test]
async fn test_non_redirect_status_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(AUTHORIZE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>sign in</html>"))
        .mount(&server)
        .await;

    let result = exchange_for(&server)
        .authorize(&Context::background(), &npsso())
        .await;

    match result {
        Err(AuthError::AuthorizationFailed { reason }) => assert!(reason.contains("200")),
        other => panic!("expected AuthorizationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_location_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(AUTHORIZE_PATH))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let result = exchange_for(&server)
        .authorize(&Context::background(), &npsso())
        .await;

    assert!(matches!(result, Err(AuthError::AuthorizationFailed { .. })));
}

// ============================================================================
// Token step
// ============================================================================

#[tokio::test]
async fn test_token_endpoint_error_status() {
    let server = MockServer::start().await;
    mount_redirect(&server, "https://example.invalid/cb?code=v3abc").await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .mount(&server)
        .await;

    let result = exchange_for(&server)
        .exchange(&Context::background(), &npsso())
        .await;

    match result {
        Err(AuthError::TokenExchangeFailed {
            status,
            body_snippet,
        }) => {
            assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
            assert!(body_snippet.contains("invalid_grant"));
        }
        other => panic!("expected TokenExchangeFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_token_response() {
    let server = MockServer::start().await;
    mount_redirect(&server, "https://example.invalid/cb?code=v3abc").await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = exchange_for(&server)
        .exchange(&Context::background(), &npsso())
        .await;

    assert!(matches!(result, Err(AuthError::MalformedTokenResponse(_))));
}

#[tokio::test]
async fn test_huge_expires_in_saturates_expiry() {
    let server = MockServer::start().await;
    mount_redirect(&server, "https://example.invalid/cb?code=v3abc").await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A",
            "refresh_token": "B",
            "expires_in": 10_000_000_000_000u64,
            "refresh_token_expires_in": u64::MAX
        })))
        .mount(&server)
        .await;

    let tokens = exchange_for(&server)
        .exchange(&Context::background(), &npsso())
        .await
        .unwrap();

    assert_eq!(tokens.access_expires_at, chrono::DateTime::<Utc>::MAX_UTC);
    assert_eq!(tokens.refresh_expires_at, chrono::DateTime::<Utc>::MAX_UTC);
    assert!(!tokens.is_access_expired());
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_deadline_during_token_request_cancels() {
    let server = MockServer::start().await;
    mount_redirect(&server, "https://example.invalid/cb?code=v3abc").await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let ctx = Context::with_timeout(Duration::from_millis(300));
    let result = exchange_for(&server).exchange(&ctx, &npsso()).await;

    assert!(matches!(result, Err(AuthError::Cancelled)));
}

#[tokio::test]
async fn test_cancelled_context_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(AUTHORIZE_PATH))
        .respond_with(ResponseTemplate::new(302))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = Context::background();
    ctx.cancel();
    let result = exchange_for(&server).exchange(&ctx, &npsso()).await;

    assert!(matches!(result, Err(AuthError::Cancelled)));
}

// ============================================================================
// Refresh grant
// ============================================================================

#[tokio::test]
async fn test_refresh_uses_refresh_token_grant() {
    let server = MockServer::start().await;
    mount_redirect(&server, "https://example.invalid/cb?code=v3abc").await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=B"))
        .and(body_string_contains("scope=psn%3Amobile.v2.core+psn%3Aclientapp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "refresh_token": "B2",
            "expires_in": 3600,
            "refresh_token_expires_in": 5184000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exchange = exchange_for(&server);
    let ctx = Context::background();
    let tokens = exchange.exchange(&ctx, &npsso()).await.unwrap();
    let refreshed = exchange.refresh(&ctx, &tokens).await.unwrap();

    assert_eq!(refreshed.access_token.as_str(), "A2");
    assert_eq!(refreshed.refresh_token.as_str(), "B2");
}

#[tokio::test]
async fn test_refresh_with_expired_refresh_token_fails_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(0)
        .mount(&server)
        .await;

    let mut tokens = psn_auth::TokenPair::default();
    tokens.refresh_token = psn_auth::RefreshToken::new("B");
    tokens.refresh_expires_at = Utc::now() - chrono::Duration::seconds(1);

    let result = exchange_for(&server)
        .refresh(&Context::background(), &tokens)
        .await;

    assert!(matches!(result, Err(AuthError::RefreshTokenExpired)));
}
