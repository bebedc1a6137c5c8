//! Daily quote notification scheduling.

use async_trait::async_trait;
use chrono::NaiveTime;

use super::MirrorStore;
use crate::models::{QuoteWithCategory, ScheduledNotification, DAILY_QUOTE_NOTIFICATION_ID};
use crate::Result;

/// Something that can deliver a repeating local notification.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Replace any schedule with the same identifier
    async fn schedule(&self, notification: ScheduledNotification) -> Result<()>;

    async fn cancel(&self, id: &str) -> Result<()>;

    async fn pending(&self, id: &str) -> Result<Option<ScheduledNotification>>;
}

/// Scheduler persisting schedules in the local mirror file.
#[derive(Clone)]
pub struct StoreNotificationScheduler {
    store: MirrorStore,
}

impl StoreNotificationScheduler {
    pub const fn new(store: MirrorStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationScheduler for StoreNotificationScheduler {
    async fn schedule(&self, notification: ScheduledNotification) -> Result<()> {
        tracing::info!(
            id = %notification.id,
            fire_time = %notification.fire_time,
            "Scheduling daily notification"
        );
        self.store.save_schedule(&notification).await
    }

    async fn cancel(&self, id: &str) -> Result<()> {
        if self.store.delete_schedule(id).await? {
            tracing::info!(%id, "Cancelled notification");
        }
        Ok(())
    }

    async fn pending(&self, id: &str) -> Result<Option<ScheduledNotification>> {
        self.store.load_schedule(id).await
    }
}

/// Schedule the daily quote notification with `quote` at `fire_time`.
pub async fn schedule_daily_quote(
    scheduler: &dyn NotificationScheduler,
    quote: &QuoteWithCategory,
    fire_time: NaiveTime,
) -> Result<ScheduledNotification> {
    let notification =
        ScheduledNotification::daily_quote(&quote.quote.text, &quote.quote.author, fire_time);
    scheduler.schedule(notification.clone()).await?;
    Ok(notification)
}

pub async fn cancel_daily_quote(scheduler: &dyn NotificationScheduler) -> Result<()> {
    scheduler.cancel(DAILY_QUOTE_NOTIFICATION_ID).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryBackend;
    use crate::gateway::{QuoteBackend, QuoteQuery};

    #[tokio::test(flavor = "multi_thread")]
    async fn schedule_replaces_and_cancel_removes() {
        let scheduler =
            StoreNotificationScheduler::new(MirrorStore::open_in_memory().await.unwrap());
        let backend = MemoryBackend::with_catalog();
        let quotes = backend.list_quotes(&QuoteQuery::page(0, 2)).await.unwrap();

        schedule_daily_quote(
            &scheduler,
            &quotes[0],
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        )
        .await
        .unwrap();
        let second = schedule_daily_quote(
            &scheduler,
            &quotes[1],
            NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
        )
        .await
        .unwrap();

        let pending = scheduler
            .pending(DAILY_QUOTE_NOTIFICATION_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pending.body, second.body);
        assert_eq!(pending.fire_time, NaiveTime::from_hms_opt(21, 0, 0).unwrap());

        cancel_daily_quote(&scheduler).await.unwrap();
        cancel_daily_quote(&scheduler).await.unwrap();
        assert!(scheduler
            .pending(DAILY_QUOTE_NOTIFICATION_ID)
            .await
            .unwrap()
            .is_none());
    }
}
