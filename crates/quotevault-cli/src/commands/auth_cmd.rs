use quotevault_core::auth::SignUpOutcome;

use super::common::Runtime;
use crate::auth::clear_stored_session;
use crate::cli::AuthCommands;
use crate::error::CliError;

pub async fn run_auth(runtime: &Runtime, command: AuthCommands) -> Result<(), CliError> {
    let profile_name = &runtime.profile_name;
    let session = runtime.session();

    match command {
        AuthCommands::Login { email, password } => {
            session.sign_in(&email, &password).await?;
            println!(
                "Signed in profile '{profile_name}' as {}",
                signed_in_label(runtime)
            );
        }
        AuthCommands::Signup {
            email,
            password,
            display_name,
        } => match session.sign_up(&email, &password, &display_name).await? {
            SignUpOutcome::SignedIn(_) => {
                println!(
                    "Created account and signed in profile '{profile_name}' as {}",
                    signed_in_label(runtime)
                );
            }
            SignUpOutcome::ConfirmationRequired => {
                println!("Check {} to confirm your account, then sign in.", email.trim());
            }
        },
        AuthCommands::Status => {
            if session.snapshot().is_authenticated() {
                println!(
                    "Profile '{profile_name}' is signed in as {}",
                    signed_in_label(runtime)
                );
                if let Some(name) = session.profile().and_then(|profile| profile.display_name) {
                    println!("Display name: {name}");
                }
            } else {
                println!("Profile '{profile_name}' is not signed in.");
            }
            println!("Project: {}", runtime.config.supabase_url);
        }
        AuthCommands::Logout => {
            session.sign_out().await?;
            clear_stored_session(profile_name).map_err(|error| CliError::Auth(error.to_string()))?;
            println!("Signed out profile '{profile_name}'");
        }
        AuthCommands::Reset { email } => {
            session.reset_password(&email).await?;
            println!("Password reset email sent to {}", email.trim());
        }
    }
    Ok(())
}

fn signed_in_label(runtime: &Runtime) -> String {
    runtime
        .session()
        .snapshot()
        .user
        .and_then(|user| user.email)
        .unwrap_or_else(|| "(no email)".to_string())
}
