//! Reminder request shape handed to the notification center.

use crate::model::prospect::{Prospect, ProspectId};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hour of day (local time) at which prospect reminders fire.
pub const REMINDER_HOUR: u32 = 9;

/// Sound played when the alert is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSound {
    Default,
}

/// User-visible alert content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub subtitle: String,
    pub sound: NotificationSound,
}

/// Calendar trigger matching a wall-clock time of day.
///
/// Only hour and minute are matched; seconds are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarTrigger {
    hour: u32,
    minute: Option<u32>,
    repeats: bool,
}

impl CalendarTrigger {
    /// Builds a trigger for `hour:minute`; `None` when out of range.
    pub fn at(hour: u32, minute: Option<u32>, repeats: bool) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute.unwrap_or(0), 0)?;
        Some(Self {
            hour,
            minute,
            repeats,
        })
    }

    /// One-shot trigger at the reminder hour.
    pub fn reminder() -> Self {
        Self {
            hour: REMINDER_HOUR,
            minute: None,
            repeats: false,
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> Option<u32> {
        self.minute
    }

    pub fn repeats(&self) -> bool {
        self.repeats
    }

    /// Returns the first matching local time strictly after `now`.
    pub fn next_fire_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute.unwrap_or(0), 0)
            .unwrap_or_default();
        let today = now.date().and_time(time);
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }
}

/// One scheduled reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Fresh UUID per request; repeated schedules never collide.
    pub id: String,
    pub prospect_id: ProspectId,
    pub content: NotificationContent,
    pub trigger: CalendarTrigger,
    /// Local wall-clock time the trigger resolved to when scheduled.
    pub fire_at: NaiveDateTime,
}

impl NotificationRequest {
    /// Builds the "Contact {name}" reminder for `prospect`.
    pub fn reminder_for(
        prospect: &Prospect,
        trigger: CalendarTrigger,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prospect_id: prospect.id,
            content: NotificationContent {
                title: format!("Contact {}", prospect.name),
                subtitle: prospect.email_address.clone(),
                sound: NotificationSound::Default,
            },
            trigger,
            fire_at: trigger.next_fire_after(now),
        }
    }

    /// Re-resolves `fire_at` against `now`, keeping id and content.
    ///
    /// Used when the request is added later than it was built.
    pub fn resolved_at(mut self, now: NaiveDateTime) -> Self {
        self.fire_at = self.trigger.next_fire_after(now);
        self
    }

    /// `fire_at` in the device time zone as epoch milliseconds.
    ///
    /// `None` when the local time does not exist (DST gap).
    pub fn fire_at_epoch_ms(&self) -> Option<i64> {
        Local
            .from_local_datetime(&self.fire_at)
            .earliest()
            .map(|at| at.timestamp_millis())
    }
}
