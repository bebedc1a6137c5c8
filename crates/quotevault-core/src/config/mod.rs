//! Client configuration shared by every front end.
//!
//! A `ClientConfig` names the Supabase project and the third-party quote API.
//! Front ends layer several sources (flags, environment, saved profile) with
//! [`ClientConfig::or`] and then call [`ClientConfig::resolve`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gateway::DEFAULT_QUOTES_API_URL;
use crate::util::{is_http_url, normalize_text_option};

pub const ENV_SUPABASE_URL: &str = "QUOTEVAULT_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "QUOTEVAULT_SUPABASE_ANON_KEY";
pub const ENV_QUOTES_API_URL: &str = "QUOTEVAULT_QUOTES_API_URL";
pub const ENV_QUOTES_API_KEY: &str = "QUOTEVAULT_QUOTES_API_KEY";

/// Partially known client configuration; every field is optional.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub quotes_api_url: Option<String>,
    #[serde(default)]
    pub quotes_api_key: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &self.supabase_anon_key)
            .field("quotes_api_url", &self.quotes_api_url)
            .field(
                "quotes_api_key",
                &self.quotes_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Read the `QUOTEVAULT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any name → value lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            supabase_url: lookup(ENV_SUPABASE_URL),
            supabase_anon_key: lookup(ENV_SUPABASE_ANON_KEY),
            quotes_api_url: lookup(ENV_QUOTES_API_URL),
            quotes_api_key: lookup(ENV_QUOTES_API_KEY),
        }
        .normalized()
    }

    /// Field-wise fallback: values present in `self` win.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        let this = self.normalized();
        let fallback = fallback.normalized();
        Self {
            supabase_url: this.supabase_url.or(fallback.supabase_url),
            supabase_anon_key: this.supabase_anon_key.or(fallback.supabase_anon_key),
            quotes_api_url: this.quotes_api_url.or(fallback.quotes_api_url),
            quotes_api_key: this.quotes_api_key.or(fallback.quotes_api_key),
        }
    }

    /// Validate the layered values.
    ///
    /// Supabase URL and anon key are required; the quote API URL defaults to
    /// API Ninjas and its key may be absent.
    pub fn resolve(&self) -> Result<ResolvedConfig, String> {
        let config = self.clone().normalized();
        let supabase_url = required_http_url(config.supabase_url, "supabase_url", ENV_SUPABASE_URL)?;
        let supabase_anon_key = config.supabase_anon_key.ok_or_else(|| {
            format!("supabase_anon_key is required (set {ENV_SUPABASE_ANON_KEY})")
        })?;
        let quotes_api_url = match config.quotes_api_url {
            Some(url) => required_http_url(Some(url), "quotes_api_url", ENV_QUOTES_API_URL)?,
            None => DEFAULT_QUOTES_API_URL.to_string(),
        };

        Ok(ResolvedConfig {
            supabase_url,
            supabase_anon_key,
            quotes_api_url,
            quotes_api_key: config.quotes_api_key,
        })
    }

    #[must_use]
    fn normalized(self) -> Self {
        Self {
            supabase_url: normalize_text_option(self.supabase_url),
            supabase_anon_key: normalize_text_option(self.supabase_anon_key),
            quotes_api_url: normalize_text_option(self.quotes_api_url),
            quotes_api_key: normalize_text_option(self.quotes_api_key),
        }
    }
}

/// Validated configuration ready to build clients from.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub quotes_api_url: String,
    pub quotes_api_key: Option<String>,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("supabase_url", &self.supabase_url)
            .field("quotes_api_url", &self.quotes_api_url)
            .field(
                "quotes_api_key",
                &self.quotes_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish_non_exhaustive()
    }
}

fn required_http_url(value: Option<String>, field: &str, env: &str) -> Result<String, String> {
    let value = value.ok_or_else(|| format!("{field} is required (set {env})"))?;
    if is_http_url(&value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(format!("{field} must include http:// or https://"))
    }
}
