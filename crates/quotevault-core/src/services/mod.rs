//! Shared services built on the gateway and the local mirror.

pub mod collections;
pub mod favorites;
mod mirror;
pub mod notifications;
pub mod quotes;

pub use mirror::MirrorStore;
pub use notifications::{NotificationScheduler, StoreNotificationScheduler};
