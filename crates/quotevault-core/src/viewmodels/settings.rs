//! Settings screen: profile preferences and the daily notification.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::watch;

use super::AppContext;
use crate::models::{AccentColor, ProfileUpdate, ThemeMode, UserProfile, DEFAULT_FONT_SIZE};
use crate::observable::Published;
use crate::services::notifications::{cancel_daily_quote, schedule_daily_quote};
use crate::services::{quotes, NotificationScheduler};
use crate::{Error, Result};

/// How long `save_succeeded` stays set after a save
pub const SAVE_CONFIRMATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
    pub display_name: String,
    pub theme: ThemeMode,
    pub accent: AccentColor,
    pub font_size: u32,
    pub notification_enabled: bool,
    pub notification_time: NaiveTime,
    pub is_loading: bool,
    pub error: Option<String>,
    pub save_succeeded: bool,
    /// Set once the form reflects the stored profile; saving requires it
    pub profile_loaded: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            theme: ThemeMode::default(),
            accent: AccentColor::default(),
            font_size: DEFAULT_FONT_SIZE,
            notification_enabled: true,
            notification_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            is_loading: false,
            error: None,
            save_succeeded: false,
            profile_loaded: false,
        }
    }
}

impl SettingsState {
    fn to_update(&self) -> ProfileUpdate {
        let display_name = self.display_name.trim();
        ProfileUpdate {
            display_name: (!display_name.is_empty()).then(|| display_name.to_string()),
            avatar_url: None,
            accent_color: Some(self.accent),
            font_size: Some(self.font_size),
            theme: Some(self.theme),
            notification_enabled: Some(self.notification_enabled),
            notification_time: Some(self.notification_time),
        }
    }
}

#[derive(Clone)]
pub struct SettingsViewModel {
    ctx: AppContext,
    scheduler: Arc<dyn NotificationScheduler>,
    state: Arc<Published<SettingsState>>,
}

impl SettingsViewModel {
    pub fn new(ctx: AppContext, scheduler: Arc<dyn NotificationScheduler>) -> Self {
        Self {
            ctx,
            scheduler,
            state: Arc::new(Published::default()),
        }
    }

    pub fn state(&self) -> SettingsState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<SettingsState> {
        self.state.subscribe()
    }

    /// Change form fields before saving
    pub fn edit(&self, change: impl FnOnce(&mut SettingsState)) {
        self.state.update(change);
    }

    /// Copy the current profile into the form; no-op without a profile.
    pub fn load_from_profile(&self) {
        let Some(profile) = self.ctx.session.profile() else {
            return;
        };
        self.state.update(|state| apply_profile(state, &profile));
    }

    /// Persist the form, then reschedule or cancel the daily notification.
    ///
    /// Refuses to send anything until [`Self::load_from_profile`] has filled
    /// the form, since every field is written.
    pub async fn save(&self, today: NaiveDate) {
        if !self.state.with(|state| state.profile_loaded) {
            let error = if self.ctx.session.current_user_id().is_none() {
                Error::Unauthorized
            } else {
                Error::InvalidInput("Profile not loaded; settings were not saved".to_string())
            };
            self.state.update(|state| {
                state.error = Some(error.to_string());
                state.save_succeeded = false;
            });
            return;
        }

        let update = self.state.with(SettingsState::to_update);
        self.state.update(|state| {
            state.is_loading = true;
            state.error = None;
        });

        match self.ctx.session.update_profile(&update).await {
            Ok(()) => {
                self.sync_notification(&update, today).await;
                self.state.update(|state| state.save_succeeded = true);
                let state = Arc::clone(&self.state);
                tokio::spawn(async move {
                    tokio::time::sleep(SAVE_CONFIRMATION).await;
                    state.update(|state| state.save_succeeded = false);
                });
            }
            Err(error) => self.state.update(|state| state.error = Some(error.to_string())),
        }

        self.state.update(|state| state.is_loading = false);
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.ctx.session.sign_out().await
    }

    // Notification failures never fail the save.
    async fn sync_notification(&self, update: &ProfileUpdate, today: NaiveDate) {
        let enabled = update.notification_enabled.unwrap_or(false);
        if !enabled {
            if let Err(error) = cancel_daily_quote(self.scheduler.as_ref()).await {
                tracing::warn!("Failed to cancel daily notification: {}", error);
            }
            return;
        }

        let fire_time = update
            .notification_time
            .unwrap_or_else(|| SettingsState::default().notification_time);
        match quotes::quote_of_day(self.ctx.backend.as_ref(), today).await {
            Ok(Some(quote)) => {
                if let Err(error) =
                    schedule_daily_quote(self.scheduler.as_ref(), &quote, fire_time).await
                {
                    tracing::warn!("Failed to schedule daily notification: {}", error);
                }
            }
            Ok(None) => tracing::debug!("No quote available for the daily notification"),
            Err(error) => tracing::warn!("Failed to fetch quote for notification: {}", error),
        }
    }
}

fn apply_profile(state: &mut SettingsState, profile: &UserProfile) {
    state.display_name = profile.display_name.clone().unwrap_or_default();
    state.theme = profile.theme_mode();
    state.accent = profile.accent();
    state.font_size = profile.font_size;
    state.notification_enabled = profile.notification_enabled;
    state.notification_time = profile.notification_time;
    state.profile_loaded = true;
}
