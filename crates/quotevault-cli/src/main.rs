//! QuoteVault CLI - browse, favorite and collect quotes from the terminal

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::{
    open_runtime, run_auth, run_collections, run_completions, run_config, run_discover,
    run_discover_offline, run_favorites, run_random, run_settings, run_share, run_today,
    DiscoverRequest, GlobalOptions,
};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "quotevault=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = GlobalOptions {
        db_path: cli.db_path,
        profile: cli.profile,
        supabase_url: cli.supabase_url,
        supabase_anon_key: cli.supabase_anon_key,
    };

    match cli.command {
        Commands::Random { category } => run_random(&options, category.as_deref()).await,
        Commands::Config { command } => run_config(&options, command),
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        command => {
            let runtime = open_runtime(&options).await?;
            match command {
                Commands::Today { category, json } => {
                    run_today(&runtime, category.as_deref(), json).await
                }
                Commands::Discover {
                    category,
                    search,
                    pages,
                    json,
                    offline,
                } => {
                    let request = DiscoverRequest {
                        category: category.as_deref(),
                        search: search.as_deref(),
                        pages,
                        json,
                    };
                    if offline {
                        run_discover_offline(&runtime, &request).await
                    } else {
                        run_discover(&runtime, &request).await
                    }
                }
                Commands::Favorites { command } => run_favorites(&runtime, command).await,
                Commands::Collections { command } => run_collections(&runtime, command).await,
                Commands::Settings { command } => run_settings(&runtime, command).await,
                Commands::Share {
                    id,
                    format,
                    style,
                    output,
                } => run_share(&runtime, &id, format, &style, output.as_deref()).await,
                Commands::Auth { command } => run_auth(&runtime, command).await,
                Commands::Random { .. } | Commands::Config { .. } | Commands::Completions { .. } => {
                    Ok(())
                }
            }
        }
    }
}
