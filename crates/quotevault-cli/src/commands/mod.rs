mod auth_cmd;
mod collections;
pub mod common;
pub mod completions;
pub mod config;
pub mod discover;
mod favorites;
mod random;
pub mod settings;
pub mod share;
mod today;

pub use auth_cmd::run_auth;
pub use collections::run_collections;
pub use common::{open_runtime, GlobalOptions};
pub use completions::run_completions;
pub use config::run_config;
pub use discover::{run_discover, run_discover_offline, DiscoverRequest};
pub use favorites::run_favorites;
pub use random::run_random;
pub use settings::run_settings;
pub use share::run_share;
pub use today::run_today;
