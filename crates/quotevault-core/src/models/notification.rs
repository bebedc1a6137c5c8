//! Daily notification schedule model

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the single daily quote notification
pub const DAILY_QUOTE_NOTIFICATION_ID: &str = "dailyQuoteNotification";

/// Title shown on the daily quote notification
pub const DAILY_QUOTE_NOTIFICATION_TITLE: &str = "✨ Your Daily Inspiration";

/// A local notification repeating daily at a wall-clock time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub fire_time: NaiveTime,
    pub repeats_daily: bool,
    pub scheduled_at: DateTime<Utc>,
}

impl ScheduledNotification {
    /// The daily quote notification for `text` by `author`
    #[must_use]
    pub fn daily_quote(text: &str, author: &str, fire_time: NaiveTime) -> Self {
        Self {
            id: DAILY_QUOTE_NOTIFICATION_ID.to_string(),
            title: DAILY_QUOTE_NOTIFICATION_TITLE.to_string(),
            body: format!("\"{text}\" — {author}"),
            fire_time,
            repeats_daily: true,
            scheduled_at: Utc::now(),
        }
    }

    /// Next occurrence of `fire_time` strictly after `now` (same clock)
    #[must_use]
    pub fn next_fire_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.fire_time);
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }
}
