//! Core domain logic for HotProspects.
//! This crate is the single source of truth for prospect, reminder and
//! self-card behavior; UI shells call into it through `hotprospects_ffi`.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod qr;
pub mod repo;
pub mod scan;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::profile::UserProfile;
pub use model::prospect::{Prospect, ProspectId, ProspectUpdate};
pub use notify::center::{
    AuthorizationOptions, AuthorizationStatus, ManagedNotificationCenter, NotificationCenter,
    NotificationError,
};
pub use notify::request::{CalendarTrigger, NotificationRequest, REMINDER_HOUR};
pub use notify::scheduler::{ReminderScheduler, ScheduleOutcome};
pub use qr::QrError;
pub use repo::prospect_repo::{
    ProspectFilter, ProspectListQuery, ProspectRepository, ProspectSort, RepoError, RepoResult,
    SqliteProspectRepository,
};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use scan::{parse_scan_payload, ScanError, ScanResult};
pub use service::profile_service::{ProfileService, ProfileServiceError};
pub use service::prospect_service::ProspectService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
