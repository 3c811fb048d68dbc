//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Apply the "degrade to no-op" policy: failures come back as envelopes,
//!   never as panics or Dart exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens its own connection; the notification center is the
//!   only process-wide state.

use hotprospects_core::db::open_db;
use hotprospects_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ManagedNotificationCenter, NotificationError, NotificationRequest, ProfileService,
    Prospect, ProspectFilter, ProspectId, ProspectService, ProspectSort, ProspectUpdate,
    ReminderScheduler, RepoResult, ScheduleOutcome, SqliteProspectRepository,
    SqliteSettingsRepository, UserProfile,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

const DB_FILE_NAME: &str = "hotprospects.sqlite3";
const DB_PATH_ENV: &str = "HOTPROSPECTS_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static NOTIFICATION_CENTER: OnceLock<ManagedNotificationCenter> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One prospect row for list and detail views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProspectItem {
    /// Stable prospect ID in string form.
    pub id: String,
    pub name: String,
    pub email_address: String,
    pub is_contacted: bool,
}

/// List response for one filtered/sorted view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProspectListResponse {
    pub items: Vec<ProspectItem>,
    /// Navigation title for the applied filter.
    pub title: String,
    /// Applied filter id (`all|contacted|uncontacted`).
    pub filter: String,
    /// Applied sort id (`name|insertion`).
    pub sort: String,
    /// Human-readable diagnostics; empty on success.
    pub message: String,
}

/// Action response envelope for single-prospect mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProspectActionResponse {
    /// Whether the call completed; a no-op on a missing id still counts.
    pub ok: bool,
    /// Prospect state after the action, when it exists.
    pub prospect: Option<ProspectItem>,
    pub message: String,
}

impl ProspectActionResponse {
    fn success(message: impl Into<String>, prospect: Option<Prospect>) -> Self {
        Self {
            ok: true,
            prospect: prospect.map(to_prospect_item),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            prospect: None,
            message: message.into(),
        }
    }
}

/// Bulk delete response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProspectDeleteResponse {
    pub ok: bool,
    pub removed: u32,
    pub message: String,
}

/// Reminder scheduling response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderResponse {
    pub ok: bool,
    /// `scheduled|permission_requested|dropped|not_found|failed`.
    pub state: String,
    pub request_id: Option<String>,
    pub message: String,
}

/// Reminder waiting for OS delivery by the host shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReminder {
    pub id: String,
    pub prospect_id: String,
    pub title: String,
    pub subtitle: String,
    pub hour: u32,
    pub minute: Option<u32>,
    pub repeats: bool,
    /// Resolved first fire time, device time zone.
    pub fire_at_epoch_ms: Option<i64>,
}

/// Self-card profile response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResponse {
    pub ok: bool,
    pub name: String,
    pub email_address: String,
    pub message: String,
}

/// Rendered self-card image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImageResponse {
    pub ok: bool,
    /// PNG bytes; empty on failure.
    pub png: Vec<u8>,
    pub message: String,
}

/// Adds a prospect from the manual form.
#[flutter_rust_bridge::frb(sync)]
pub fn prospect_add(name: String, email_address: String) -> ProspectActionResponse {
    match with_prospect_service(|service| service.add_prospect(name, email_address)) {
        Ok(prospect) => ProspectActionResponse::success("Prospect added.", Some(prospect)),
        Err(err) => ProspectActionResponse::failure(format!("prospect_add failed: {err}")),
    }
}

/// Imports decoded QR text (`"name\nemail"`).
///
/// # FFI contract
/// - Malformed payloads are discarded: `ok=true`, `prospect=None`.
#[flutter_rust_bridge::frb(sync)]
pub fn prospect_import_scan(payload: String) -> ProspectActionResponse {
    match with_prospect_service(|service| service.import_scan(payload.as_str())) {
        Ok(Some(prospect)) => ProspectActionResponse::success("Prospect imported.", Some(prospect)),
        Ok(None) => ProspectActionResponse::success("Scan discarded.", None),
        Err(err) => {
            ProspectActionResponse::failure(format!("prospect_import_scan failed: {err}"))
        }
    }
}

/// Saves the edit form; `None` fields keep their stored values.
#[flutter_rust_bridge::frb(sync)]
pub fn prospect_update(
    id: String,
    name: Option<String>,
    email_address: Option<String>,
) -> ProspectActionResponse {
    let Some(id) = parse_id(&id) else {
        return ProspectActionResponse::success("Prospect not found.", None);
    };
    let update = ProspectUpdate {
        name,
        email_address,
        is_contacted: None,
    };
    match with_prospect_service(|service| service.update_prospect(id, &update)) {
        Ok(Some(prospect)) => ProspectActionResponse::success("Prospect saved.", Some(prospect)),
        Ok(None) => ProspectActionResponse::success("Prospect not found.", None),
        Err(err) => ProspectActionResponse::failure(format!("prospect_update failed: {err}")),
    }
}

/// Swipe action: mark contacted/uncontacted.
#[flutter_rust_bridge::frb(sync)]
pub fn prospect_toggle_contacted(id: String) -> ProspectActionResponse {
    let Some(id) = parse_id(&id) else {
        return ProspectActionResponse::success("Prospect not found.", None);
    };
    let result = with_prospect_service(|service| {
        service.toggle_contacted(id)?;
        service.get_prospect(id)
    });
    match result {
        Ok(Some(prospect)) => ProspectActionResponse::success(
            if prospect.is_contacted {
                "Marked contacted."
            } else {
                "Marked uncontacted."
            },
            Some(prospect),
        ),
        Ok(None) => ProspectActionResponse::success("Prospect not found.", None),
        Err(err) => {
            ProspectActionResponse::failure(format!("prospect_toggle_contacted failed: {err}"))
        }
    }
}

/// Swipe action: delete one prospect.
#[flutter_rust_bridge::frb(sync)]
pub fn prospect_delete(id: String) -> ProspectActionResponse {
    let Some(id) = parse_id(&id) else {
        return ProspectActionResponse::success("Prospect not found.", None);
    };
    match with_prospect_service(|service| service.delete_prospect(id)) {
        Ok(true) => ProspectActionResponse::success("Prospect deleted.", None),
        Ok(false) => ProspectActionResponse::success("Prospect not found.", None),
        Err(err) => ProspectActionResponse::failure(format!("prospect_delete failed: {err}")),
    }
}

/// Deletes the current multi-selection; unparseable ids are skipped.
#[flutter_rust_bridge::frb(sync)]
pub fn prospect_delete_many(ids: Vec<String>) -> ProspectDeleteResponse {
    let parsed = ids
        .iter()
        .filter_map(|id| parse_id(id))
        .collect::<Vec<_>>();
    match with_prospect_service(|service| service.delete_prospects(&parsed)) {
        Ok(removed) => ProspectDeleteResponse {
            ok: true,
            removed: u32::try_from(removed).unwrap_or(u32::MAX),
            message: format!("Deleted {removed} prospect(s)."),
        },
        Err(err) => ProspectDeleteResponse {
            ok: false,
            removed: 0,
            message: format!("prospect_delete_many failed: {err}"),
        },
    }
}

/// Lists one view. Unknown filter/sort ids fall back to `all` / `name`.
#[flutter_rust_bridge::frb(sync)]
pub fn prospects_list(filter: String, sort: String) -> ProspectListResponse {
    let filter = ProspectFilter::parse(&filter).unwrap_or_default();
    let sort = ProspectSort::parse(&sort).unwrap_or_default();
    let (items, message) =
        match with_prospect_service(|service| service.list_prospects(filter, sort)) {
            Ok(prospects) => (
                prospects.into_iter().map(to_prospect_item).collect(),
                String::new(),
            ),
            Err(err) => (Vec::new(), format!("prospects_list failed: {err}")),
        };

    ProspectListResponse {
        items,
        title: filter.title().to_string(),
        filter: filter.as_str().to_string(),
        sort: sort.as_str().to_string(),
        message,
    }
}

/// Swipe action: "Remind Me".
///
/// # FFI contract
/// - When permission is undetermined, the host must prompt the user and
///   report back through `notification_resolve_authorization`.
#[flutter_rust_bridge::frb(sync)]
pub fn prospect_remind(id: String) -> ReminderResponse {
    let lookup = match parse_id(&id) {
        Some(id) => with_prospect_service(|service| service.get_prospect(id)),
        None => Ok(None),
    };
    let prospect = match lookup {
        Ok(Some(prospect)) => prospect,
        Ok(None) => return reminder_response(true, "not_found", None, "Prospect not found."),
        Err(err) => {
            return reminder_response(
                false,
                "failed",
                None,
                format!("prospect_remind failed: {err}"),
            )
        }
    };

    let scheduler = ReminderScheduler::new(Arc::new(notification_center().clone()));
    match scheduler.schedule(&prospect) {
        ScheduleOutcome::Scheduled { request_id } => {
            reminder_response(true, "scheduled", Some(request_id), "Reminder scheduled.")
        }
        ScheduleOutcome::PermissionRequested { request_id } => reminder_response(
            true,
            "permission_requested",
            Some(request_id),
            "Waiting for notification permission.",
        ),
        ScheduleOutcome::Dropped => reminder_response(true, "dropped", None, "Reminder dropped."),
    }
}

/// Reports the user's answer to the notification permission prompt.
///
/// `error` set means the platform failed to ask; the status stays undetermined.
/// Returns the number of parked reminder requests that were resolved.
#[flutter_rust_bridge::frb(sync)]
pub fn notification_resolve_authorization(granted: bool, error: Option<String>) -> u32 {
    let answer = match error {
        Some(message) => Err(NotificationError::Authorization(message)),
        None => Ok(granted),
    };
    let resolved = notification_center().resolve_authorization(answer);
    u32::try_from(resolved).unwrap_or(u32::MAX)
}

/// Drains reminders the host should hand to the OS notification API.
#[flutter_rust_bridge::frb(sync)]
pub fn notification_take_pending() -> Vec<PendingReminder> {
    notification_center()
        .take_queued()
        .into_iter()
        .map(to_pending_reminder)
        .collect()
}

/// Reads the self-card profile (defaults when never edited).
#[flutter_rust_bridge::frb(sync)]
pub fn profile_get() -> ProfileResponse {
    match with_profile_service(|service| service.profile()) {
        Ok(profile) => profile_response(profile, String::new()),
        Err(err) => ProfileResponse {
            ok: false,
            message: format!("profile_get failed: {err}"),
            ..profile_response(UserProfile::default(), String::new())
        },
    }
}

/// Overwrites the self-card profile.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_update(name: String, email_address: String) -> ProfileResponse {
    let profile = UserProfile::new(name, email_address);
    match with_profile_service(|service| service.update_profile(&profile)) {
        Ok(()) => profile_response(profile, "Profile saved.".to_string()),
        Err(err) => ProfileResponse {
            ok: false,
            message: format!("profile_update failed: {err}"),
            ..profile_response(profile, String::new())
        },
    }
}

/// Renders the self-card as PNG, at least `min_size` px square.
///
/// Sizes above `hotprospects_core::qr::MAX_QR_SIZE` return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_qr_png(min_size: u32) -> QrImageResponse {
    let db_path = resolve_db_path();
    let rendered = open_db(&db_path)
        .map_err(|err| format!("DB open failed: {err}"))
        .and_then(|conn| {
            ProfileService::new(SqliteSettingsRepository::new(&conn))
                .qr_png(min_size)
                .map_err(|err| err.to_string())
        });

    match rendered {
        Ok(png) => QrImageResponse {
            ok: true,
            png,
            message: String::new(),
        },
        Err(err) => {
            warn!("event=profile_qr module=ffi status=error error={err}");
            QrImageResponse {
                ok: false,
                png: Vec::new(),
                message: format!("profile_qr_png failed: {err}"),
            }
        }
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn notification_center() -> &'static ManagedNotificationCenter {
    NOTIFICATION_CENTER.get_or_init(ManagedNotificationCenter::new)
}

fn with_prospect_service<T>(
    f: impl FnOnce(&ProspectService<SqliteProspectRepository<'_>>) -> RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("DB open failed: {err}"))?;
    let service = ProspectService::new(SqliteProspectRepository::new(&conn));
    f(&service).map_err(|err| err.to_string())
}

fn with_profile_service<T>(
    f: impl FnOnce(&ProfileService<SqliteSettingsRepository<'_>>) -> RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("DB open failed: {err}"))?;
    let service = ProfileService::new(SqliteSettingsRepository::new(&conn));
    f(&service).map_err(|err| err.to_string())
}

fn parse_id(raw: &str) -> Option<ProspectId> {
    Uuid::parse_str(raw.trim()).ok()
}

fn to_prospect_item(prospect: Prospect) -> ProspectItem {
    ProspectItem {
        id: prospect.id.to_string(),
        name: prospect.name,
        email_address: prospect.email_address,
        is_contacted: prospect.is_contacted,
    }
}

fn to_pending_reminder(request: NotificationRequest) -> PendingReminder {
    PendingReminder {
        fire_at_epoch_ms: request.fire_at_epoch_ms(),
        id: request.id,
        prospect_id: request.prospect_id.to_string(),
        title: request.content.title,
        subtitle: request.content.subtitle,
        hour: request.trigger.hour(),
        minute: request.trigger.minute(),
        repeats: request.trigger.repeats(),
    }
}

fn reminder_response(
    ok: bool,
    state: &str,
    request_id: Option<String>,
    message: impl Into<String>,
) -> ReminderResponse {
    ReminderResponse {
        ok,
        state: state.to_string(),
        request_id,
        message: message.into(),
    }
}

fn profile_response(profile: UserProfile, message: String) -> ProfileResponse {
    ProfileResponse {
        ok: true,
        name: profile.name,
        email_address: profile.email_address,
        message,
    }
}
