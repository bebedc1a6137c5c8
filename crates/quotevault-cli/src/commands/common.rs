use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use quotevault_core::config::{ClientConfig, ResolvedConfig};
use quotevault_core::gateway::{BearerToken, QuoteBackend, SupabaseGateway};
use quotevault_core::models::{Category, CollectionId, QuoteId, QuoteWithCategory, UserId};
use quotevault_core::services::MirrorStore;
use quotevault_core::session::SessionManager;
use quotevault_core::viewmodels::AppContext;
use serde::Serialize;

use crate::auth::auth_client_for_profile;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

const MIRROR_FILE_NAME: &str = "mirror.db";

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub db_path: Option<PathBuf>,
    pub profile: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

impl GlobalOptions {
    fn flags(&self) -> ClientConfig {
        ClientConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            ..ClientConfig::default()
        }
    }
}

/// Everything a command needs to talk to the backend.
pub struct Runtime {
    pub profile_name: String,
    pub config: ResolvedConfig,
    pub ctx: AppContext,
    pub mirror: MirrorStore,
}

impl Runtime {
    pub fn session(&self) -> &SessionManager {
        &self.ctx.session
    }

    pub fn backend(&self) -> &dyn QuoteBackend {
        self.ctx.backend.as_ref()
    }

    pub fn require_user(&self) -> Result<UserId, CliError> {
        self.session().current_user_id().ok_or(CliError::NotSignedIn)
    }
}

/// Layer flags over environment over the saved profile.
pub fn resolve_client_config(options: &GlobalOptions) -> Result<(String, ClientConfig), CliError> {
    let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = profiles.resolve_profile_name(options.profile.as_deref());
    let layered = options
        .flags()
        .or(ClientConfig::from_env())
        .or(profiles.profile(&profile_name));
    Ok((profile_name, layered))
}

/// Open the mirror, build clients and restore any stored session.
pub async fn open_runtime(options: &GlobalOptions) -> Result<Runtime, CliError> {
    let (profile_name, layered) = resolve_client_config(options)?;
    let config = layered.resolve().map_err(CliError::Config)?;
    let mirror = open_mirror(options.db_path.as_deref()).await?;

    let token = BearerToken::default();
    let gateway = SupabaseGateway::new(
        &config.supabase_url,
        config.supabase_anon_key.clone(),
        token.clone(),
    )?;
    let auth = auth_client_for_profile(
        &profile_name,
        &config.supabase_url,
        &config.supabase_anon_key,
    )
    .map_err(|error| CliError::Auth(error.to_string()))?;

    let backend: Arc<dyn QuoteBackend> = Arc::new(gateway);
    let session = SessionManager::new(Arc::new(auth), Arc::clone(&backend), token);
    session.check_session().await;
    tracing::debug!(
        profile = %profile_name,
        signed_in = session.snapshot().is_authenticated(),
        "Runtime ready"
    );

    let ctx = AppContext::new(backend, session).with_mirror(mirror.clone());
    Ok(Runtime {
        profile_name,
        config,
        ctx,
        mirror,
    })
}

pub fn default_mirror_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("quotevault").join(MIRROR_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve data directory".to_string()))
}

/// Open the local mirror; failure is fatal for every command that needs it.
pub async fn open_mirror(db_path: Option<&Path>) -> Result<MirrorStore, CliError> {
    let path = match db_path {
        Some(path) => path.to_path_buf(),
        None => default_mirror_path()?,
    };
    MirrorStore::open_path(&path)
        .await
        .map_err(|error| CliError::MirrorUnavailable {
            path: path.display().to_string(),
            reason: error.to_string(),
        })
}

pub fn parse_quote_id(value: &str) -> Result<QuoteId, CliError> {
    value.parse().map_err(|_| CliError::InvalidId {
        kind: "quote",
        value: value.to_string(),
    })
}

pub fn parse_collection_id(value: &str) -> Result<CollectionId, CliError> {
    value.parse().map_err(|_| CliError::InvalidId {
        kind: "collection",
        value: value.to_string(),
    })
}

/// Case-insensitive category lookup by name.
pub fn find_category<'a>(categories: &'a [Category], name: &str) -> Result<&'a Category, CliError> {
    let name = name.trim();
    categories
        .iter()
        .find(|category| category.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| CliError::UnknownCategory(name.to_string()))
}

/// Surface a view-model's `error` as a command failure.
pub fn check_error(error: Option<String>) -> Result<(), CliError> {
    error.map_or(Ok(()), |message| Err(CliError::Operation(message)))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn join_words(words: &[String]) -> String {
    words.join(" ").trim().to_string()
}

#[derive(Debug, Serialize)]
pub struct QuoteListItem {
    pub id: String,
    pub text: String,
    pub author: String,
    pub category: String,
    pub likes: i64,
    pub favorited: bool,
}

impl QuoteListItem {
    pub fn new(quote: &QuoteWithCategory, favorited: bool) -> Self {
        Self {
            id: quote.id().to_string(),
            text: quote.quote.text.clone(),
            author: quote.quote.author.clone(),
            category: quote.category_name().to_string(),
            likes: quote.quote.likes_count,
            favorited,
        }
    }
}

/// One-line listing: id, heart, quote and author.
pub fn format_quote_line(quote: &QuoteWithCategory, favorited: bool) -> String {
    let marker = if favorited { '♥' } else { ' ' };
    format!(
        "{} {marker} \"{}\" — {} [{}]",
        quote.id(),
        preview(&quote.quote.text, 80),
        quote.quote.author,
        quote.category_name()
    )
}

pub fn preview(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let cut: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}
