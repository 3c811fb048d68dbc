//! Notification center contract and the in-process host bridge.
//!
//! # Responsibility
//! - Abstract the platform notification API behind `NotificationCenter`.
//! - Park permission prompts until the host reports the user's answer.
//! - Queue granted requests until the host hands them to the OS.
//!
//! # Invariants
//! - Callbacks are never invoked while the center's lock is held.
//! - Requests are only queued while authorized.

use crate::notify::request::NotificationRequest;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Current notification permission state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// The user has not been asked yet.
    #[default]
    NotDetermined,
    Denied,
    Authorized,
}

impl AuthorizationStatus {
    /// Returns whether requests may be added in this state.
    pub fn allows_delivery(self) -> bool {
        matches!(self, Self::Authorized)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotDetermined => "not_determined",
            Self::Denied => "denied",
            Self::Authorized => "authorized",
        }
    }
}

/// Presentation capabilities asked for in a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationOptions {
    pub alert: bool,
    pub badge: bool,
    pub sound: bool,
}

impl AuthorizationOptions {
    pub const ALERT_BADGE_SOUND: Self = Self {
        alert: true,
        badge: true,
        sound: true,
    };
}

/// Notification center errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The platform failed while asking for permission.
    Authorization(String),
    /// A request was added without permission.
    NotAuthorized,
    /// The platform rejected a request.
    Rejected(String),
}

impl Display for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authorization(message) => write!(f, "authorization failed: {message}"),
            Self::NotAuthorized => write!(f, "notifications are not authorized"),
            Self::Rejected(message) => write!(f, "notification request rejected: {message}"),
        }
    }
}

impl Error for NotificationError {}

/// Completion invoked once with the permission answer (`Ok(granted)`).
pub type AuthorizationCallback =
    Box<dyn FnOnce(Result<bool, NotificationError>) + Send + 'static>;

/// Platform notification API.
pub trait NotificationCenter: Send + Sync {
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Asks for permission; `completion` may run now or after the user answers.
    fn request_authorization(
        &self,
        options: AuthorizationOptions,
        completion: AuthorizationCallback,
    );

    fn add(&self, request: NotificationRequest) -> Result<(), NotificationError>;
}

#[derive(Default)]
struct CenterState {
    status: AuthorizationStatus,
    awaiting: Vec<AuthorizationCallback>,
    queued: Vec<NotificationRequest>,
}

/// In-process center shared with the UI host.
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct ManagedNotificationCenter {
    state: Arc<Mutex<CenterState>>,
}

impl ManagedNotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a center whose permission state is already known.
    pub fn with_status(status: AuthorizationStatus) -> Self {
        let center = Self::new();
        center.lock().status = status;
        center
    }

    /// Records the user's answer and runs every parked completion.
    ///
    /// `Ok(true)` authorizes, `Ok(false)` denies, and an error leaves the
    /// status unchanged. Returns the number of completions invoked.
    pub fn resolve_authorization(&self, answer: Result<bool, NotificationError>) -> usize {
        let awaiting = {
            let mut state = self.lock();
            match answer {
                Ok(true) => state.status = AuthorizationStatus::Authorized,
                Ok(false) => state.status = AuthorizationStatus::Denied,
                Err(_) => {}
            }
            std::mem::take(&mut state.awaiting)
        };

        info!(
            "event=notification_authorization module=notify status={} granted={} waiting={}",
            if answer.is_ok() { "ok" } else { "error" },
            matches!(answer, Ok(true)),
            awaiting.len()
        );

        let invoked = awaiting.len();
        for completion in awaiting {
            completion(answer.clone());
        }
        invoked
    }

    /// Drains requests waiting for OS delivery, oldest first.
    pub fn take_queued(&self) -> Vec<NotificationRequest> {
        std::mem::take(&mut self.lock().queued)
    }

    pub fn queued_len(&self) -> usize {
        self.lock().queued.len()
    }

    /// Number of permission prompts still waiting for an answer.
    pub fn awaiting_len(&self) -> usize {
        self.lock().awaiting.len()
    }

    fn lock(&self) -> MutexGuard<'_, CenterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationCenter for ManagedNotificationCenter {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.lock().status
    }

    fn request_authorization(
        &self,
        options: AuthorizationOptions,
        completion: AuthorizationCallback,
    ) {
        let known = {
            let mut state = self.lock();
            let status = state.status;
            match status {
                AuthorizationStatus::NotDetermined => {
                    state.awaiting.push(completion);
                    None
                }
                status => Some((status.allows_delivery(), completion)),
            }
        };

        match known {
            // The platform only prompts once; later requests answer immediately.
            Some((granted, completion)) => completion(Ok(granted)),
            None => debug!(
                "event=notification_authorization module=notify status=start alert={} badge={} sound={}",
                options.alert, options.badge, options.sound
            ),
        }
    }

    fn add(&self, request: NotificationRequest) -> Result<(), NotificationError> {
        let mut state = self.lock();
        if !state.status.allows_delivery() {
            return Err(NotificationError::NotAuthorized);
        }
        state.queued.push(request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AuthorizationOptions, AuthorizationStatus, ManagedNotificationCenter, NotificationCenter,
        NotificationError,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn undetermined_prompt_waits_for_host_answer() {
        let center = ManagedNotificationCenter::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        center.request_authorization(
            AuthorizationOptions::ALERT_BADGE_SOUND,
            Box::new(move |answer: Result<bool, NotificationError>| {
                assert_eq!(answer, Ok(true));
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(center.awaiting_len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(center.resolve_authorization(Ok(true)), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(center.authorization_status(), AuthorizationStatus::Authorized);
        assert_eq!(center.awaiting_len(), 0);
    }

    #[test]
    fn known_status_answers_immediately() {
        let center = ManagedNotificationCenter::with_status(AuthorizationStatus::Denied);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        center.request_authorization(
            AuthorizationOptions::ALERT_BADGE_SOUND,
            Box::new(move |answer: Result<bool, NotificationError>| {
                assert_eq!(answer, Ok(false));
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(center.awaiting_len(), 0);
    }

    #[test]
    fn authorization_error_keeps_status_undetermined() {
        let center = ManagedNotificationCenter::new();
        center.request_authorization(
            AuthorizationOptions::ALERT_BADGE_SOUND,
            Box::new(|_answer: Result<bool, NotificationError>| {}),
        );

        center.resolve_authorization(Err(NotificationError::Authorization("boom".into())));
        assert_eq!(
            center.authorization_status(),
            AuthorizationStatus::NotDetermined
        );
    }

    #[test]
    fn only_authorized_status_allows_delivery() {
        assert!(AuthorizationStatus::Authorized.allows_delivery());
        assert!(!AuthorizationStatus::Denied.allows_delivery());
        assert!(!AuthorizationStatus::NotDetermined.allows_delivery());
    }

    #[test]
    fn clones_share_state() {
        let center = ManagedNotificationCenter::new();
        let host_side = center.clone();
        host_side.resolve_authorization(Ok(true));
        assert!(center.authorization_status().allows_delivery());
    }
}
