use std::sync::Arc;

use chrono::{Local, NaiveTime};
use quotevault_core::models::{AccentColor, ThemeMode, DAILY_QUOTE_NOTIFICATION_ID};
use quotevault_core::services::{NotificationScheduler, StoreNotificationScheduler};
use quotevault_core::viewmodels::{SettingsState, SettingsViewModel};

use super::common::{check_error, today, Runtime};
use crate::cli::SettingsCommands;
use crate::error::CliError;

/// Values passed to `settings set`; `None` keeps the current setting.
#[derive(Debug, Default)]
pub struct SettingsChanges {
    pub display_name: Option<String>,
    pub theme: Option<String>,
    pub accent: Option<String>,
    pub font_size: Option<u32>,
    pub notifications: Option<bool>,
    pub notification_time: Option<String>,
}

impl SettingsChanges {
    fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.theme.is_none()
            && self.accent.is_none()
            && self.font_size.is_none()
            && self.notifications.is_none()
            && self.notification_time.is_none()
    }

    /// Validate every value before touching the form.
    pub fn apply(self, state: &mut SettingsState) -> Result<(), CliError> {
        let theme = self
            .theme
            .map(|value| value.parse::<ThemeMode>())
            .transpose()
            .map_err(CliError::InvalidArgument)?;
        let accent = self
            .accent
            .map(|value| value.parse::<AccentColor>())
            .transpose()
            .map_err(CliError::InvalidArgument)?;
        let notification_time = self
            .notification_time
            .as_deref()
            .map(parse_notification_time)
            .transpose()?;
        if self.font_size == Some(0) {
            return Err(CliError::InvalidArgument(
                "font size must be greater than zero".to_string(),
            ));
        }

        if let Some(display_name) = self.display_name {
            state.display_name = display_name;
        }
        if let Some(theme) = theme {
            state.theme = theme;
        }
        if let Some(accent) = accent {
            state.accent = accent;
        }
        if let Some(font_size) = self.font_size {
            state.font_size = font_size;
        }
        if let Some(enabled) = self.notifications {
            state.notification_enabled = enabled;
        }
        if let Some(time) = notification_time {
            state.notification_time = time;
        }
        Ok(())
    }
}

pub fn parse_notification_time(value: &str) -> Result<NaiveTime, CliError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        CliError::InvalidArgument(format!("Invalid notification time '{value}', expected HH:MM"))
    })
}

pub async fn run_settings(runtime: &Runtime, command: SettingsCommands) -> Result<(), CliError> {
    runtime.require_user()?;
    let scheduler = Arc::new(StoreNotificationScheduler::new(runtime.mirror.clone()));
    let settings = SettingsViewModel::new(runtime.ctx.clone(), scheduler.clone());
    load_settings_form(runtime, &settings).await?;

    match command {
        SettingsCommands::Show => {
            print_settings(&settings.state());
            if let Some(pending) = scheduler.pending(DAILY_QUOTE_NOTIFICATION_ID).await? {
                let next = pending.next_fire_after(Local::now().naive_local());
                println!("Next notification: {} ({})", next.format("%Y-%m-%d %H:%M"), pending.body);
            }
        }
        SettingsCommands::Set {
            display_name,
            theme,
            accent,
            font_size,
            notifications,
            notification_time,
        } => {
            let changes = SettingsChanges {
                display_name,
                theme,
                accent,
                font_size,
                notifications,
                notification_time,
            };
            if changes.is_empty() {
                return Err(CliError::InvalidArgument(
                    "Nothing to change; pass at least one option".to_string(),
                ));
            }

            let mut form = settings.state();
            changes.apply(&mut form)?;
            settings.edit(|state| *state = form);
            settings.save(today()).await;

            let state = settings.state();
            check_error(state.error.clone())?;
            println!("Settings saved");
            print_settings(&state);
        }
    }
    Ok(())
}

/// Fill the form from the stored profile, fetching it again if sign-in could not.
pub async fn load_settings_form(
    runtime: &Runtime,
    settings: &SettingsViewModel,
) -> Result<(), CliError> {
    settings.load_from_profile();
    if !settings.state().profile_loaded {
        runtime.session().refresh_profile().await;
        settings.load_from_profile();
    }
    if settings.state().profile_loaded {
        Ok(())
    } else {
        Err(CliError::Operation(
            "Could not load your profile; settings were left unchanged".to_string(),
        ))
    }
}

fn print_settings(state: &SettingsState) {
    let display_name = if state.display_name.trim().is_empty() {
        "(not set)"
    } else {
        state.display_name.as_str()
    };
    let notifications = if state.notification_enabled {
        format!("on at {}", state.notification_time.format("%H:%M"))
    } else {
        "off".to_string()
    };
    println!("Display name:  {display_name}");
    println!("Theme:         {}", state.theme);
    println!("Accent:        {}", state.accent);
    println!("Font size:     {}", state.font_size);
    println!("Notifications: {notifications}");
}
