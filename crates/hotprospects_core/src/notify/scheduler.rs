//! Permission-gated reminder scheduling.

use crate::model::prospect::Prospect;
use crate::notify::center::{AuthorizationOptions, NotificationCenter, NotificationError};
use crate::notify::request::{CalendarTrigger, NotificationRequest};
use chrono::{Local, NaiveDateTime};
use log::{info, warn};
use std::sync::Arc;

/// Local wall-clock source, injectable for tests.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Immediate result of one `schedule` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Permission was already granted and the request was added.
    Scheduled { request_id: String },
    /// Permission was asked for; the request is added only on grant.
    PermissionRequested { request_id: String },
    /// The center refused the request; it was dropped.
    Dropped,
}

/// Schedules one-shot "Contact {name}" reminders.
pub struct ReminderScheduler {
    center: Arc<dyn NotificationCenter>,
    trigger: CalendarTrigger,
    clock: Clock,
}

impl ReminderScheduler {
    /// Creates a scheduler firing at the default reminder hour.
    pub fn new(center: Arc<dyn NotificationCenter>) -> Self {
        Self {
            center,
            trigger: CalendarTrigger::reminder(),
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }

    pub fn with_trigger(mut self, trigger: CalendarTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Schedules a reminder for `prospect`, asking for permission first if needed.
    ///
    /// The fire time is resolved against the clock when the request is
    /// actually added, so a late grant never yields a past time.
    ///
    /// Denials and center errors are logged and dropped. Calls are not
    /// deduplicated: each one builds a request with a fresh id.
    pub fn schedule(&self, prospect: &Prospect) -> ScheduleOutcome {
        let request = NotificationRequest::reminder_for(prospect, self.trigger, (self.clock)());
        let request_id = request.id.clone();

        if self.center.authorization_status().allows_delivery() {
            return if add_request(self.center.as_ref(), request) {
                ScheduleOutcome::Scheduled { request_id }
            } else {
                ScheduleOutcome::Dropped
            };
        }

        let center = Arc::clone(&self.center);
        let clock = Arc::clone(&self.clock);
        self.center.request_authorization(
            AuthorizationOptions::ALERT_BADGE_SOUND,
            Box::new(move |answer: Result<bool, NotificationError>| match answer {
                Ok(true) => {
                    // The grant may arrive long after the prompt.
                    add_request(center.as_ref(), request.resolved_at(clock()));
                }
                Ok(false) => info!(
                    "event=reminder_schedule module=notify status=skip reason=permission_denied request_id={}",
                    request.id
                ),
                Err(err) => warn!(
                    "event=reminder_schedule module=notify status=error reason=authorization_failed request_id={} error={}",
                    request.id, err
                ),
            }),
        );

        ScheduleOutcome::PermissionRequested { request_id }
    }
}

fn add_request(center: &dyn NotificationCenter, request: NotificationRequest) -> bool {
    let request_id = request.id.clone();
    let prospect_id = request.prospect_id;
    match center.add(request) {
        Ok(()) => {
            info!(
                "event=reminder_schedule module=notify status=ok request_id={} prospect_id={}",
                request_id, prospect_id
            );
            true
        }
        Err(err) => {
            warn!(
                "event=reminder_schedule module=notify status=error request_id={} error={}",
                request_id, err
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReminderScheduler, ScheduleOutcome};
    use crate::model::prospect::Prospect;
    use crate::notify::center::{AuthorizationStatus, ManagedNotificationCenter, NotificationError};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn scheduler_for(center: &ManagedNotificationCenter) -> ReminderScheduler {
        ReminderScheduler::new(Arc::new(center.clone())).with_clock(Arc::new(|| {
            NaiveDate::from_ymd_opt(2025, 1, 24)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        }))
    }

    #[test]
    fn authorized_schedule_adds_request_immediately() {
        let center = ManagedNotificationCenter::with_status(AuthorizationStatus::Authorized);
        let prospect = Prospect::new("A", "a@x.com");

        let outcome = scheduler_for(&center).schedule(&prospect);
        let queued = center.take_queued();

        assert_eq!(queued.len(), 1);
        assert_eq!(
            outcome,
            ScheduleOutcome::Scheduled {
                request_id: queued[0].id.clone()
            }
        );
        assert_eq!(
            queued[0].fire_at,
            NaiveDate::from_ymd_opt(2025, 1, 25)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn grant_after_prompt_adds_exactly_one_request() {
        let center = ManagedNotificationCenter::new();
        let prospect = Prospect::new("A", "a@x.com");

        let outcome = scheduler_for(&center).schedule(&prospect);
        assert!(matches!(outcome, ScheduleOutcome::PermissionRequested { .. }));
        assert_eq!(center.queued_len(), 0);

        center.resolve_authorization(Ok(true));
        let queued = center.take_queued();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].content.title, "Contact A");
    }

    #[test]
    fn denied_prompt_drops_request() {
        let center = ManagedNotificationCenter::new();
        scheduler_for(&center).schedule(&Prospect::new("A", "a@x.com"));

        center.resolve_authorization(Ok(false));
        assert_eq!(center.queued_len(), 0);

        scheduler_for(&center).schedule(&Prospect::new("B", "b@x.com"));
        assert_eq!(center.queued_len(), 0);
    }

    #[test]
    fn authorization_error_drops_request() {
        let center = ManagedNotificationCenter::new();
        scheduler_for(&center).schedule(&Prospect::new("A", "a@x.com"));

        center.resolve_authorization(Err(NotificationError::Authorization("offline".into())));
        assert_eq!(center.queued_len(), 0);
    }

    #[test]
    fn repeated_schedules_are_independent() {
        let center = ManagedNotificationCenter::with_status(AuthorizationStatus::Authorized);
        let scheduler = scheduler_for(&center);
        let prospect = Prospect::new("A", "a@x.com");

        scheduler.schedule(&prospect);
        scheduler.schedule(&prospect);

        let queued = center.take_queued();
        assert_eq!(queued.len(), 2);
        assert_ne!(queued[0].id, queued[1].id);
    }
}
