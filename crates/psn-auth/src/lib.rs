//! npsso-based authentication for the PlayStation Network
//!
//! This crate turns the `npsso` session cookie of a signed-in Sony account
//! into an OAuth access/refresh token pair.
//!
//! # Authentication Flow
//!
//! 1. The npsso is validated locally (non-empty, exactly 64 characters)
//! 2. `GET` on the authorize endpoint with the npsso cookie, answered by a
//!    302 whose `Location` carries a `v3...` authorization code
//! 3. `POST` on the token endpoint trading the code for a token pair
//!
//! Refreshing uses the `refresh_token` grant against the same token endpoint.
//!
//! # Example
//!
//! ```no_run
//! use psn_auth::{AuthConfig, Context, HttpTimeouts, Npsso, TokenExchange, build_http_client};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let http = build_http_client(None, &HttpTimeouts::default(), None)?;
//! let exchange = TokenExchange::new(AuthConfig::default(), http);
//!
//! let npsso = Npsso::new("<64 character npsso cookie value>")?;
//! let ctx = Context::with_timeout(std::time::Duration::from_secs(10));
//! let tokens = exchange.exchange(&ctx, &npsso).await?;
//! println!("Access token valid until {}", tokens.access_expires_at);
//!
//! // Later, before the access token runs out
//! let tokens = exchange.refresh(&ctx, &tokens).await?;
//! # let _ = tokens;
//! # Ok(())
//! # }
//! # tokio_test::block_on(example()).unwrap();
//! ```
//!
//! # Important Notes
//!
//! - The npsso and both tokens are secrets; their `Debug` output is redacted
//!   and their memory is zeroized on drop
//! - The HTTP client must not follow redirects, use [`build_http_client`]

pub mod config;
pub mod context;
pub mod credential;
pub mod errors;
pub mod exchange;
pub mod models;
pub mod tokens;
pub mod transport;

// Re-export main types
pub use config::{AuthConfig, AuthEndpoints, ClientApp, HttpTimeouts};
pub use context::{Cancelled, Context};
pub use credential::{Npsso, validate};
pub use errors::{AuthError, CredentialError, Result};
pub use exchange::TokenExchange;
pub use models::TokenResponse;
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use transport::build_http_client;
