//! Notification schedule repository implementation

use chrono::{DateTime, NaiveTime};
use libsql::{params, Connection};

use crate::error::{Error, Result};
use crate::models::ScheduledNotification;

/// Trait for notification schedule storage (async)
#[allow(async_fn_in_trait)]
pub trait ScheduleRepository {
    /// Insert or replace a schedule keyed by its identifier
    async fn save(&self, notification: &ScheduledNotification) -> Result<()>;

    async fn load(&self, id: &str) -> Result<Option<ScheduledNotification>>;

    /// Returns whether a schedule was removed
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// libSQL implementation of `ScheduleRepository`
pub struct LibSqlScheduleRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlScheduleRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl ScheduleRepository for LibSqlScheduleRepository<'_> {
    async fn save(&self, notification: &ScheduledNotification) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO scheduled_notifications
                    (id, title, body, fire_time, repeats_daily, scheduled_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    notification.id.as_str(),
                    notification.title.as_str(),
                    notification.body.as_str(),
                    notification.fire_time.format("%H:%M:%S").to_string(),
                    i64::from(notification.repeats_daily),
                    notification.scheduled_at.timestamp_millis()
                ],
            )
            .await?;
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<ScheduledNotification>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, title, body, fire_time, repeats_daily, scheduled_at
                 FROM scheduled_notifications WHERE id = ?",
                [id],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let fire_time: String = row.get(3)?;
        let fire_time = NaiveTime::parse_from_str(&fire_time, "%H:%M:%S")
            .map_err(|error| Error::Decode(format!("invalid fire time {fire_time}: {error}")))?;
        let scheduled_at: i64 = row.get(5)?;

        Ok(Some(ScheduledNotification {
            id: row.get(0)?,
            title: row.get(1)?,
            body: row.get(2)?,
            fire_time,
            repeats_daily: row.get::<i64>(4)? != 0,
            scheduled_at: DateTime::from_timestamp_millis(scheduled_at).unwrap_or_default(),
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM scheduled_notifications WHERE id = ?", [id])
            .await?;
        Ok(affected > 0)
    }
}
