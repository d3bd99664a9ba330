use psn_auth::Context;
use tracing::instrument;
use url::Url;

use crate::config::DEFAULT_GAMES_LIMIT;
use crate::errors::{PsnError, Result};
use crate::models::{UserAccountResponse, UserGamesResponse, UserProfileResponse};
use crate::session::AuthenticatedSession;

/// Paging window for the game library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamesPage {
    pub limit: u32,
    pub offset: u32,
}

impl Default for GamesPage {
    fn default() -> Self {
        Self {
            limit: DEFAULT_GAMES_LIMIT,
            offset: 0,
        }
    }
}

impl AuthenticatedSession {
    /// Look up the account ID behind an online ID
    #[instrument(skip(self, ctx))]
    pub async fn get_user_account_id(
        &self,
        ctx: &Context,
        online_id: &str,
    ) -> Result<UserAccountResponse> {
        let mut url = endpoint(
            &self.client().config().api.legacy_profile_base,
            &["userProfile", "v1", "users", online_id, "profile2"],
        )?;
        url.query_pairs_mut()
            .append_pair("fields", "accountId,onlineId,currentOnlineId");

        self.request_and_decode(ctx, url).await
    }

    /// Fetch the profile of an account
    #[instrument(skip(self, ctx))]
    pub async fn get_user_profile(
        &self,
        ctx: &Context,
        account_id: &str,
    ) -> Result<UserProfileResponse> {
        let url = endpoint(
            &self.client().config().api.mobile_base,
            &["api", "userProfile", "v1", "internal", "users", account_id, "profiles"],
        )?;

        self.request_and_decode(ctx, url).await
    }

    /// Fetch the first page of an account's played titles
    pub async fn get_user_games(&self, ctx: &Context, account_id: &str) -> Result<UserGamesResponse> {
        self.get_user_games_page(ctx, account_id, GamesPage::default())
            .await
    }

    /// Fetch one page of an account's played titles
    #[instrument(skip(self, ctx))]
    pub async fn get_user_games_page(
        &self,
        ctx: &Context,
        account_id: &str,
        page: GamesPage,
    ) -> Result<UserGamesResponse> {
        let mut url = endpoint(
            &self.client().config().api.mobile_base,
            &["api", "gamelist", "v2", "users", account_id, "titles"],
        )?;
        url.query_pairs_mut()
            .append_pair("limit", &page.limit.to_string());
        if page.offset > 0 {
            url.query_pairs_mut()
                .append_pair("offset", &page.offset.to_string());
        }

        self.request_and_decode(ctx, url).await
    }
}

/// Append percent-encoded path segments to `base`
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| PsnError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
