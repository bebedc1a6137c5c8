//! Local mirror database

mod connection;
mod migrations;
mod mirror_repository;
mod schedule_repository;

pub use connection::Database;
pub use mirror_repository::{Cached, LibSqlMirrorRepository, MirrorRepository};
pub use schedule_repository::{LibSqlScheduleRepository, ScheduleRepository};
