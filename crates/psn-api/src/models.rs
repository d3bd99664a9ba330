use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error envelope every PlayStation API body may carry.
///
/// A body without an `error` member decodes to the default, code 0.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestError {
    #[serde(default)]
    pub error: RequestErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestErrorBody {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reference_id: String,
}

/// `profile2` lookup of an online ID
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserAccountResponse {
    pub profile: AccountProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    #[serde(default)]
    pub online_id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub current_online_id: String,
}

/// Profile of an account ID
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    #[serde(default)]
    pub online_id: String,
    #[serde(default)]
    pub personal_detail: PersonalDetail,
    #[serde(default)]
    pub about_me: String,
    #[serde(default)]
    pub avatars: Vec<Image>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub is_plus: bool,
    #[serde(default)]
    pub is_officially_verified: bool,
    #[serde(default)]
    pub is_me: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetail {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub profile_pictures: Vec<Image>,
}

/// Sized avatar or profile picture
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub size: String,
    pub url: String,
}

/// One page of an account's played titles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserGamesResponse {
    #[serde(default)]
    pub titles: Vec<GameTitle>,
    #[serde(default)]
    pub next_offset: Option<u32>,
    #[serde(default)]
    pub previous_offset: Option<u32>,
    #[serde(default)]
    pub total_item_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameTitle {
    #[serde(default)]
    pub title_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub localized_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub localized_image_url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub play_count: u32,
    #[serde(default)]
    pub concept: Option<Concept>,
    #[serde(default)]
    pub media: Media,
    #[serde(default)]
    pub first_played_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_played_date_time: Option<DateTime<Utc>>,
    /// ISO 8601 duration, e.g. `PT12H34M56S`
    #[serde(default)]
    pub play_duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title_ids: Vec<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub media: Media,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub localized_name: LocalizedName,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Media {
    #[serde(default)]
    pub audios: Vec<serde_json::Value>,
    #[serde(default)]
    pub videos: Vec<serde_json::Value>,
    #[serde(default)]
    pub images: Vec<MediaImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaImage {
    pub url: String,
    #[serde(default)]
    pub format: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Concept name keyed by language tag (`en-US`, `ja-JP`, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedName {
    #[serde(default)]
    pub default_language: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl LocalizedName {
    /// Name in `language`, falling back to the default language
    pub fn get(&self, language: &str) -> Option<&str> {
        self.metadata
            .get(language)
            .or_else(|| self.metadata.get(&self.default_language))
            .map(String::as_str)
    }
}
