//! Read-only PlayStation Network API client
//!
//! Authenticates with the `npsso` cookie of a signed-in Sony account (see
//! [`psn_auth`]) and queries account, profile and game library endpoints.
//!
//! # Example
//!
//! ```no_run
//! use psn_api::{Context, PsnClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PsnClient::builder()
//!     .region("gb")?
//!     .language("en-GB")?
//!     .build()?;
//!
//! let ctx = Context::with_timeout(std::time::Duration::from_secs(30));
//! let session = client.authenticate(&ctx, "<64 character npsso>").await?;
//!
//! let account = session.get_user_account_id(&ctx, "Hakoom").await?;
//! let games = session
//!     .get_user_games(&ctx, &account.profile.account_id)
//!     .await?;
//! for title in games.titles {
//!     println!("{} played {} times", title.name, title.play_count);
//! }
//! # Ok(())
//! # }
//! # tokio_test::block_on(example()).unwrap();
//! ```
//!
//! # Token Lifetime
//!
//! Sessions check the access token before every request. Once it has
//! expired the session renews it with the refresh_token grant, falling back
//! to a fresh npsso exchange ([`RefreshStrategy`]). Nothing runs in the
//! background and nothing is written to disk.
//!
//! # Errors
//!
//! 404 and 429 fail immediately with [`PsnError::NotFound`] and
//! [`PsnError::RateLimited`]. 401 and 403 bodies are decoded like any other,
//! so the API's own error envelope comes back as [`PsnError::RemoteError`].
//! Retries are off unless a [`RetryPolicy`] is configured.

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
mod retry;
pub mod session;

// Re-export main types
pub use api::GamesPage;
pub use client::{PsnClient, PsnClientBuilder};
pub use config::{ApiEndpoints, ClientConfig, Language, RefreshStrategy, Region, RetryPolicy};
pub use errors::{PsnError, Result};
pub use models::{UserAccountResponse, UserGamesResponse, UserProfileResponse};
pub use psn_auth::{AuthEndpoints, ClientApp, Context, TokenPair};
pub use session::AuthenticatedSession;
