//! Core domain logic for FlowNest.
//! This crate is the single source of truth for business invariants.

pub mod analytics;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod live;
pub mod logging;
pub mod model;
pub mod preferences;
pub mod quotes;
pub mod repo;
pub mod scoring;
pub mod service;
pub mod timer;

pub use auth::{AuthError, Identity, Session};
pub use config::{ConfigError, CoreConfig, QuoteConfig};
pub use dashboard::{Dashboard, DashboardError, DashboardResult};
pub use db::{open_db, open_db_in_memory, DbError};
pub use live::{Snapshot, SnapshotView, Subscription};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{OwnerId, Priority, RecordId, ValidationError, GUEST_OWNER_ID};
pub use repo::{RepoError, RepoResult};
pub use scoring::{focus_score, FocusScore, ScoreLabel};
pub use service::{ServiceError, ServiceResult};
pub use timer::{PomodoroTimer, TickOutcome, TimerDriver, TimerMode, TimerState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
