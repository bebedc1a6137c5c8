use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "quotevault")]
#[command(about = "Browse, favorite, collect and share quotes from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local mirror database
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// CLI profile name holding Supabase and quote API settings
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Supabase project URL (overrides env and profile)
    #[arg(long, global = true, value_name = "URL")]
    pub supabase_url: Option<String>,

    /// Supabase anon/public key (overrides env and profile)
    #[arg(long, global = true, value_name = "KEY")]
    pub supabase_anon_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the quote of the day and recommendations
    Today {
        /// Restrict recommendations to a category name
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse quotes page by page
    #[command(alias = "browse")]
    Discover {
        /// Category name filter
        #[arg(long)]
        category: Option<String>,
        /// Match quote text or author
        #[arg(short, long)]
        search: Option<String>,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Read quotes mirrored by earlier runs instead of the server
        #[arg(long)]
        offline: bool,
    },
    /// Fetch a random quote from the third-party quote API
    Random {
        /// Category to draw from
        #[arg(long)]
        category: Option<String>,
    },
    /// Manage favorite quotes
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
    /// Manage quote collections
    Collections {
        #[command(subcommand)]
        command: CollectionsCommands,
    },
    /// Show or change profile preferences
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Share a quote as text or a card description
    Share {
        /// Quote ID
        id: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = ShareFormatArg::Text)]
        format: ShareFormatArg,
        /// Card style (ocean, clean, nature, noir)
        #[arg(long, default_value = "ocean")]
        style: String,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign in, sign up or sign out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ShareFormatArg {
    Text,
    Card,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// List favorite quotes, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Favorite or unfavorite a quote
    Toggle {
        /// Quote ID
        id: String,
    },
    /// Remove a quote from favorites
    Remove {
        /// Quote ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CollectionsCommands {
    /// List collections with quote counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Read collections mirrored by earlier runs instead of the server
        #[arg(long)]
        offline: bool,
    },
    /// Show the quotes in a collection
    Show {
        /// Collection ID
        id: String,
    },
    /// Create a collection
    Create {
        /// Collection name
        name: Vec<String>,
    },
    /// Rename a collection
    Rename {
        /// Collection ID
        id: String,
        /// New name
        name: Vec<String>,
    },
    /// Delete a collection and its entries
    Delete {
        /// Collection ID
        id: String,
    },
    /// Add a quote to a collection
    Add {
        /// Collection ID
        collection: String,
        /// Quote ID
        quote: String,
    },
    /// Remove a quote from a collection
    Remove {
        /// Collection ID
        collection: String,
        /// Quote ID
        quote: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current preferences
    Show,
    /// Update preferences; omitted values keep their current setting
    Set {
        #[arg(long, value_name = "NAME")]
        display_name: Option<String>,
        /// light, dark or auto
        #[arg(long)]
        theme: Option<String>,
        /// blue, red, green, orange or purple
        #[arg(long)]
        accent: Option<String>,
        #[arg(long)]
        font_size: Option<u32>,
        /// Enable or disable the daily quote notification
        #[arg(long)]
        notifications: Option<bool>,
        /// Daily notification time, HH:MM
        #[arg(long, value_name = "HH:MM")]
        notification_time: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Supabase project URL
        #[arg(long = "url", value_name = "URL")]
        supabase_url: Option<String>,
        /// Supabase anon/public key
        #[arg(long = "anon-key", value_name = "KEY")]
        supabase_anon_key: Option<String>,
        /// Quote API base URL
        #[arg(long, value_name = "URL")]
        quotes_api_url: Option<String>,
        /// Quote API key
        #[arg(long, value_name = "KEY")]
        quotes_api_key: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved configuration
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with email/password and store the session in the keychain
    Login {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        #[arg(long, value_name = "NAME")]
        display_name: String,
    },
    /// Show auth status for the profile
    Status,
    /// Sign out and clear the stored session
    Logout,
    /// Send a password reset email
    Reset {
        #[arg(long, value_name = "EMAIL")]
        email: String,
    },
}
