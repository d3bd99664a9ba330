use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use psn_auth::{AuthConfig, HttpTimeouts};
use url::Url;

use crate::errors::PsnError;

/// PlayStation API base URLs
pub mod endpoints {
    pub const LEGACY_PROFILE: &str = "https://us-prof.np.community.playstation.net";
    pub const MOBILE: &str = "https://m.np.playstation.com";
}

/// Number of titles fetched per game library page by default
pub const DEFAULT_GAMES_LIMIT: u32 = 10;

macro_rules! tags {
    (
        $(#[$meta:meta])*
        $name:ident, $err:ident { $($variant:ident => $tag:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = PsnError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| PsnError::$err(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tags! {
    /// Supported PlayStation Store regions
    Region, UnsupportedRegion {
        UnitedStates => "us",
        UnitedKingdom => "gb",
        Canada => "ca",
        Australia => "au",
        Japan => "jp",
        Germany => "de",
        France => "fr",
        Spain => "es",
        Italy => "it",
        Netherlands => "nl",
        Portugal => "pt",
        Brazil => "br",
        Mexico => "mx",
        Russia => "ru",
        Poland => "pl",
        Finland => "fi",
        Denmark => "dk",
        Norway => "no",
        Sweden => "se",
        Turkey => "tr",
        Korea => "kr",
        HongKong => "hk",
        Taiwan => "tw",
        UnitedArabEmirates => "ae",
        Ukraine => "ua",
    }
}

tags! {
    /// Supported `Accept-Language` tags
    Language, UnsupportedLanguage {
        EnglishUs => "en-US",
        EnglishGb => "en-GB",
        Japanese => "ja-JP",
        French => "fr-FR",
        FrenchCa => "fr-CA",
        German => "de-DE",
        Spanish => "es-ES",
        SpanishLatam => "es-419",
        Italian => "it-IT",
        Dutch => "nl-NL",
        Portuguese => "pt-PT",
        PortugueseBr => "pt-BR",
        Russian => "ru-RU",
        Polish => "pl-PL",
        Finnish => "fi-FI",
        Danish => "da-DK",
        Norwegian => "no-NO",
        Swedish => "sv-SE",
        Turkish => "tr-TR",
        Korean => "ko-KR",
        ChineseSimplified => "zh-Hans",
        ChineseTraditional => "zh-Hant",
        Arabic => "ar-AE",
        Ukrainian => "uk-UA",
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ALL[0]
    }
}

/// Retry policy for transient failures.
///
/// Off by default: every request is a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::standard()
        }
    }

    /// Three retries starting at 500ms
    pub fn standard() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// How an expired access token is renewed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshStrategy {
    /// Use the refresh_token grant, re-running the npsso exchange if it fails
    #[default]
    RefreshToken,

    /// Always re-run the full npsso exchange
    FullReexchange,
}

/// Base URLs of the resource endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub legacy_profile_base: Url,
    pub mobile_base: Url,
}

impl ApiEndpoints {
    /// Serve every resource family from `base`
    pub fn with_base(base: &Url) -> Self {
        Self {
            legacy_profile_base: base.clone(),
            mobile_base: base.clone(),
        }
    }
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            legacy_profile_base: Url::parse(endpoints::LEGACY_PROFILE)
                .expect("valid legacy profile URL"),
            mobile_base: Url::parse(endpoints::MOBILE).expect("valid mobile API URL"),
        }
    }
}

/// Configuration for PsnClient
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub region: Region,

    /// Sent as `Accept-Language`; `None` omits the header
    pub language: Option<Language>,

    pub http_timeouts: HttpTimeouts,

    /// Custom user agent (optional)
    pub user_agent: Option<String>,

    pub retry: RetryPolicy,

    pub refresh_strategy: RefreshStrategy,

    /// Client application identity and OAuth endpoints
    pub auth: AuthConfig,

    pub api: ApiEndpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            language: Some(Language::default()),
            http_timeouts: HttpTimeouts::default(),
            user_agent: None,
            retry: RetryPolicy::default(),
            refresh_strategy: RefreshStrategy::default(),
            auth: AuthConfig::default(),
            api: ApiEndpoints::default(),
        }
    }
}
