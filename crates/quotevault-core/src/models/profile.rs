//! User profile and appearance preferences

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::theme::{AccentColor, ThemeMode};
use super::UserId;

pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Profile row, one per auth identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Stored accent name, see [`AccentColor`]
    pub accent_color: String,
    pub font_size: u32,
    /// Stored theme name, see [`ThemeMode`]
    pub theme: String,
    pub notification_enabled: bool,
    /// Daily notification wall-clock time, `HH:MM:SS`
    pub notification_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    #[must_use]
    pub fn accent(&self) -> AccentColor {
        AccentColor::from_stored(&self.accent_color)
    }

    #[must_use]
    pub fn theme_mode(&self) -> ThemeMode {
        ThemeMode::from_stored(&self.theme)
    }
}

/// Partial profile update; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<AccentColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_time: Option<NaiveTime>,
}

impl ProfileUpdate {
    /// Apply this update to a local profile copy
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(display_name) = &self.display_name {
            profile.display_name = Some(display_name.clone());
        }
        if let Some(avatar_url) = &self.avatar_url {
            profile.avatar_url = Some(avatar_url.clone());
        }
        if let Some(accent) = self.accent_color {
            profile.accent_color = accent.as_str().to_string();
        }
        if let Some(font_size) = self.font_size {
            profile.font_size = font_size;
        }
        if let Some(theme) = self.theme {
            profile.theme = theme.as_str().to_string();
        }
        if let Some(enabled) = self.notification_enabled {
            profile.notification_enabled = enabled;
        }
        if let Some(time) = self.notification_time {
            profile.notification_time = time;
        }
    }
}

/// App-wide appearance derived from the signed-in profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub theme: ThemeMode,
    pub accent: AccentColor,
    pub font_size: u32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Auto,
            accent: AccentColor::Blue,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl From<&UserProfile> for Appearance {
    fn from(profile: &UserProfile) -> Self {
        Self {
            theme: profile.theme_mode(),
            accent: profile.accent(),
            font_size: profile.font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const PROFILE_ROW: &str = r#"
    {
      "id": "9a1d6f2c-7d3e-4f7a-8b55-0c6e2d9f1a33",
      "display_name": "Ada",
      "avatar_url": null,
      "accent_color": "green",
      "font_size": 18,
      "theme": "dark",
      "notification_enabled": true,
      "notification_time": "08:30:00",
      "created_at": "2026-01-21T08:00:00+00:00",
      "updated_at": "2026-01-21T08:00:00+00:00"
    }
    "#;

    #[test]
    fn test_decode_profile_row() {
        let profile: UserProfile = serde_json::from_str(PROFILE_ROW).unwrap();
        assert_eq!(profile.accent(), AccentColor::Green);
        assert_eq!(profile.theme_mode(), ThemeMode::Dark);
        assert_eq!(
            profile.notification_time,
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            Appearance::from(&profile),
            Appearance {
                theme: ThemeMode::Dark,
                accent: AccentColor::Green,
                font_size: 18,
            }
        );
    }

    #[test]
    fn test_update_serializes_only_present_fields() {
        let update = ProfileUpdate {
            accent_color: Some(AccentColor::Purple),
            notification_time: Some(NaiveTime::from_hms_opt(7, 5, 0).unwrap()),
            ..ProfileUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "accent_color": "purple",
                "notification_time": "07:05:00"
            })
        );
    }

    #[test]
    fn test_update_applies_to_local_copy() {
        let mut profile: UserProfile = serde_json::from_str(PROFILE_ROW).unwrap();
        ProfileUpdate {
            display_name: Some("Grace".to_string()),
            theme: Some(ThemeMode::Light),
            ..ProfileUpdate::default()
        }
        .apply_to(&mut profile);
        assert_eq!(profile.display_name.as_deref(), Some("Grace"));
        assert_eq!(profile.theme, "light");
        assert_eq!(profile.accent_color, "green");
    }
}
