use quotevault_core::config::ClientConfig;

use super::common::{resolve_client_config, GlobalOptions};
use crate::cli::ConfigCommands;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub fn run_config(options: &GlobalOptions, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            supabase_url,
            supabase_anon_key,
            quotes_api_url,
            quotes_api_key,
            no_activate,
        } => run_config_init(
            options,
            ClientConfig {
                supabase_url,
                supabase_anon_key,
                quotes_api_url,
                quotes_api_key,
            },
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(options),
    }
}

/// Merge explicit values over the environment and the existing profile, then save.
fn run_config_init(
    options: &GlobalOptions,
    explicit: ClientConfig,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(options.profile.as_deref());
    let merged = explicit
        .or(ClientConfig::from_env())
        .or(config.profile(&profile_name));

    let incomplete = merged.resolve().err();

    *config.profile_mut_or_default(&profile_name) = merged;
    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }
    let path = config.save().map_err(CliError::Config)?;

    println!("Saved profile '{profile_name}' to {}", path.display());
    if no_activate {
        if let Some(active) = config.active_profile.as_deref() {
            println!("Active profile remains '{active}'");
        }
    } else {
        println!("Active profile: '{profile_name}'");
    }
    if let Some(reason) = incomplete {
        println!("Warning: profile is incomplete: {reason}");
    }
    Ok(())
}

fn run_config_show(options: &GlobalOptions) -> Result<(), CliError> {
    let (profile_name, layered) = resolve_client_config(options)?;
    println!("Profile: {profile_name}");
    match layered.resolve() {
        Ok(resolved) => {
            println!("Supabase URL:   {}", resolved.supabase_url);
            println!("Anon key:       {}", mask(&resolved.supabase_anon_key));
            println!("Quote API URL:  {}", resolved.quotes_api_url);
            println!(
                "Quote API key:  {}",
                resolved.quotes_api_key.as_deref().map_or("(not set)".to_string(), mask)
            );
        }
        Err(error) => println!("Incomplete: {error}"),
    }
    Ok(())
}

/// Keep the first four characters of a secret.
pub fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
