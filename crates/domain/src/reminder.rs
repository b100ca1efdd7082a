use crate::recurrence::{nth_occurrence, Frequency};
use crate::shared::entity::{Entity, ID};
use crate::template::TemplateVariables;
use greentick_utils::truncate_with_ellipsis;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Lifecycle state of a `Reminder`.
///
/// `Sending`, `Sent` and `Failed` are only entered by the dispatch path,
/// users can move a reminder between `Pending` and `Cancelled` and
/// re-queue a `Failed` one.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Sending,
    Sent,
    Failed,
    Cancelled,
}

impl ReminderStatus {
    pub fn can_transition_to(&self, to: ReminderStatus) -> bool {
        use ReminderStatus::*;
        matches!(
            (self, to),
            (Pending, Sending)
                | (Pending, Cancelled)
                | (Sending, Sent)
                | (Sending, Pending)
                | (Sending, Failed)
                | (Failed, Pending)
                | (Failed, Cancelled)
                | (Cancelled, Pending)
        )
    }

    /// Whether a user may request the transition through an update
    pub fn can_manually_transition_to(&self, to: ReminderStatus) -> bool {
        matches!(to, ReminderStatus::Pending | ReminderStatus::Cancelled)
            && self.can_transition_to(to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid reminder status: `{0}`")]
pub struct InvalidReminderStatusError(pub String);

impl FromStr for ReminderStatus {
    type Err = InvalidReminderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sending" => Ok(Self::Sending),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(InvalidReminderStatusError(s.to_string())),
        }
    }
}

/// A message scheduled to be sent to a `Customer` over WhatsApp.
///
/// Recurring reminders form a series of rows sharing `series_id`. Each row
/// is one occurrence and is dispatched at most once, after a successful
/// delivery the next occurrence is inserted as a new `Pending` row.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub user_id: ID,
    pub customer_id: ID,
    pub series_id: ID,
    /// Index of this occurrence within its series, starting at 0
    pub occurrence: i64,
    /// Scheduled send time of occurrence 0 of the series
    pub series_start_ts: i64,
    pub message: String,
    /// When the reminder is due. Retries move this forward, the
    /// schedule of the series is derived from `series_start_ts`
    pub send_ts: i64,
    pub status: ReminderStatus,
    pub frequency: Frequency,
    pub recurring_end_ts: Option<i64>,
    pub template_id: Option<String>,
    pub template_variables: Option<TemplateVariables>,
    /// Number of delivery attempts made for this occurrence
    pub attempts: i64,
    pub last_error: Option<String>,
    /// Message id returned by the messaging provider
    pub delivery_id: Option<String>,
    pub created: i64,
    pub updated: i64,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidReminderError {
    #[error("A recurring end date is required when frequency is `{0}`")]
    MissingRecurringEnd(Frequency),
    #[error("Reminder message can not be empty")]
    EmptyMessage,
    #[error("Reminder status can not be changed from `{0}` to `{1}`")]
    InvalidStatusTransition(ReminderStatus, ReminderStatus),
    #[error("Timestamp `{0}` is outside of the supported range")]
    TimestampOutOfRange(i64),
}

/// Latest supported timestamp, 9999-12-31T23:59:59.999Z in millis
pub const MAX_TIMESTAMP_MILLIS: i64 = 253_402_300_799_999;

fn check_timestamp(ts: i64) -> Result<i64, InvalidReminderError> {
    if (0..=MAX_TIMESTAMP_MILLIS).contains(&ts) {
        Ok(ts)
    } else {
        Err(InvalidReminderError::TimestampOutOfRange(ts))
    }
}

impl Reminder {
    pub fn new(
        user_id: ID,
        customer_id: ID,
        message: String,
        send_ts: i64,
        frequency: Frequency,
        recurring_end_ts: Option<i64>,
        now: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            customer_id,
            series_id: Default::default(),
            occurrence: 0,
            series_start_ts: send_ts,
            message,
            send_ts,
            status: ReminderStatus::Pending,
            frequency,
            recurring_end_ts,
            template_id: None,
            template_variables: None,
            attempts: 0,
            last_error: None,
            delivery_id: None,
            created: now,
            updated: now,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidReminderError> {
        check_timestamp(self.send_ts)?;
        if let Some(recurring_end_ts) = self.recurring_end_ts {
            check_timestamp(recurring_end_ts)?;
        }
        if self.frequency.is_recurring() && self.recurring_end_ts.is_none() {
            return Err(InvalidReminderError::MissingRecurringEnd(self.frequency));
        }
        if self.message.trim().is_empty() {
            return Err(InvalidReminderError::EmptyMessage);
        }
        Ok(())
    }

    /// Changes the scheduled send time of this occurrence. The series is
    /// re-anchored so that later occurrences follow the new time.
    pub fn reschedule(&mut self, send_ts: i64) -> Result<(), InvalidReminderError> {
        let send_ts = check_timestamp(send_ts)?;
        self.series_start_ts = send_ts
            .checked_sub(self.scheduled_ts())
            .and_then(|shift| self.series_start_ts.checked_add(shift))
            .ok_or(InvalidReminderError::TimestampOutOfRange(send_ts))?;
        self.send_ts = send_ts;
        Ok(())
    }

    /// Changes how often the series repeats while keeping the scheduled
    /// time of this occurrence
    pub fn set_frequency(&mut self, frequency: Frequency) -> Result<(), InvalidReminderError> {
        let scheduled_ts = self.scheduled_ts();
        let period = frequency.period_millis().unwrap_or(0);
        self.series_start_ts = period
            .checked_mul(self.occurrence)
            .and_then(|offset| scheduled_ts.checked_sub(offset))
            .ok_or(InvalidReminderError::TimestampOutOfRange(scheduled_ts))?;
        self.frequency = frequency;
        Ok(())
    }

    /// Applies a status change requested by the owner. Re-queueing resets
    /// the delivery attempts.
    pub fn change_status(&mut self, to: ReminderStatus) -> Result<(), InvalidReminderError> {
        if to == self.status {
            return Ok(());
        }
        if !self.status.can_manually_transition_to(to) {
            return Err(InvalidReminderError::InvalidStatusTransition(self.status, to));
        }
        if to == ReminderStatus::Pending {
            self.attempts = 0;
            self.last_error = None;
        }
        self.status = to;
        Ok(())
    }

    /// Originally scheduled time of this occurrence, ignoring retry backoff
    pub fn scheduled_ts(&self) -> i64 {
        match self.frequency.period_millis() {
            Some(period) => self
                .series_start_ts
                .saturating_add(period.saturating_mul(self.occurrence)),
            None => self.series_start_ts,
        }
    }

    /// Builds the next occurrence of the series, if the series continues
    pub fn next_occurrence(&self, now: i64) -> Option<Reminder> {
        let occurrence = self.occurrence + 1;
        let send_ts = nth_occurrence(
            self.frequency,
            self.series_start_ts,
            occurrence,
            self.recurring_end_ts,
        )?;

        Some(Reminder {
            id: Default::default(),
            occurrence,
            send_ts,
            status: ReminderStatus::Pending,
            attempts: 0,
            last_error: None,
            delivery_id: None,
            created: now,
            updated: now,
            ..self.clone()
        })
    }

    pub fn is_due(&self, now: i64) -> bool {
        self.status == ReminderStatus::Pending && self.send_ts <= now
    }

    pub fn message_preview(&self) -> String {
        truncate_with_ellipsis(&self.message, MESSAGE_PREVIEW_LEN)
    }

    /// Records a confirmed delivery
    pub fn mark_sent(&mut self, delivery_id: String, now: i64) {
        self.status = ReminderStatus::Sent;
        self.attempts += 1;
        self.delivery_id = Some(delivery_id);
        self.last_error = None;
        self.updated = now;
    }

    /// Records a failed delivery and either schedules a retry or gives up
    pub fn mark_delivery_failed(&mut self, error: String, policy: &RetryPolicy, now: i64) {
        self.attempts += 1;
        self.last_error = Some(error);
        self.updated = now;
        match policy.next_attempt_ts(self.attempts, now) {
            Some(retry_ts) => {
                self.status = ReminderStatus::Pending;
                self.send_ts = retry_ts;
            }
            None => {
                self.status = ReminderStatus::Failed;
            }
        }
    }
}

const MESSAGE_PREVIEW_LEN: usize = 50;

impl Entity<ID> for Reminder {
    fn id(&self) -> ID {
        self.id
    }
}

/// Exponential backoff applied to failed deliveries
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of delivery attempts before a reminder is marked `Failed`
    pub max_attempts: i64,
    pub base_delay_millis: i64,
    pub max_delay_millis: i64,
}

impl RetryPolicy {
    /// Time of the next attempt after `attempts` failed ones, `None` when
    /// no attempts are left
    pub fn next_attempt_ts(&self, attempts: i64, now: i64) -> Option<i64> {
        if attempts >= self.max_attempts {
            return None;
        }
        let exponent = (attempts - 1).clamp(0, 30) as u32;
        let delay = self
            .base_delay_millis
            .saturating_mul(2_i64.pow(exponent))
            .min(self.max_delay_millis);
        Some(now + delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_millis: 1000 * 60,
            max_delay_millis: 1000 * 60 * 60,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::prelude::*;

    fn ts(y: i32, m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn daily_reminder() -> Reminder {
        Reminder::new(
            ID::new(),
            ID::new(),
            "Your payment is due".into(),
            ts(2024, 1, 1),
            Frequency::Daily,
            Some(ts(2024, 1, 3)),
            0,
        )
    }

    #[test]
    fn status_transitions() {
        use ReminderStatus::*;
        assert!(Pending.can_transition_to(Sending));
        assert!(Sending.can_transition_to(Sent));
        assert!(Sending.can_transition_to(Failed));
        assert!(!Sent.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Sent));

        assert!(Pending.can_manually_transition_to(Cancelled));
        assert!(Failed.can_manually_transition_to(Pending));
        assert!(Cancelled.can_manually_transition_to(Pending));
        assert!(!Pending.can_manually_transition_to(Sending));
        assert!(!Sending.can_manually_transition_to(Pending));
        assert!(!Sent.can_manually_transition_to(Cancelled));
    }

    #[test]
    fn recurring_reminder_requires_end() {
        let mut reminder = daily_reminder();
        assert!(reminder.validate().is_ok());
        reminder.recurring_end_ts = None;
        assert_eq!(
            reminder.validate(),
            Err(InvalidReminderError::MissingRecurringEnd(Frequency::Daily))
        );
        reminder.frequency = Frequency::OneTime;
        assert!(reminder.validate().is_ok());
    }

    #[test]
    fn spawns_occurrences_until_end() {
        let first = daily_reminder();
        let second = first.next_occurrence(10).unwrap();
        assert_eq!(second.series_id, first.series_id);
        assert_ne!(second.id, first.id);
        assert_eq!(second.occurrence, 1);
        assert_eq!(second.send_ts, ts(2024, 1, 2));
        assert_eq!(second.status, ReminderStatus::Pending);
        assert_eq!(second.message, first.message);

        let third = second.next_occurrence(10).unwrap();
        assert_eq!(third.send_ts, ts(2024, 1, 3));
        assert!(third.next_occurrence(10).is_none());
    }

    #[test]
    fn retry_backoff_does_not_shift_series() {
        let mut first = daily_reminder();
        let policy = RetryPolicy::default();
        first.mark_delivery_failed("timeout".into(), &policy, ts(2024, 1, 1));
        assert_eq!(first.status, ReminderStatus::Pending);
        assert_eq!(first.send_ts, ts(2024, 1, 1) + policy.base_delay_millis);
        assert_eq!(first.scheduled_ts(), ts(2024, 1, 1));

        let second = first.next_occurrence(0).unwrap();
        assert_eq!(second.send_ts, ts(2024, 1, 2));
    }

    #[test]
    fn reschedule_moves_the_series() {
        let mut reminder = daily_reminder().next_occurrence(0).unwrap();
        reminder.reschedule(ts(2024, 1, 2) + 3600 * 1000).unwrap();
        assert_eq!(reminder.scheduled_ts(), ts(2024, 1, 2) + 3600 * 1000);
        assert_eq!(reminder.series_start_ts, ts(2024, 1, 1) + 3600 * 1000);
    }

    #[test]
    fn rejects_out_of_range_timestamps() {
        let mut reminder = daily_reminder();
        for send_ts in [i64::MIN, -1, MAX_TIMESTAMP_MILLIS + 1, i64::MAX] {
            assert_eq!(
                reminder.reschedule(send_ts),
                Err(InvalidReminderError::TimestampOutOfRange(send_ts))
            );
        }
        assert_eq!(reminder.send_ts, ts(2024, 1, 1));
        assert_eq!(reminder.series_start_ts, ts(2024, 1, 1));
        assert!(reminder.reschedule(MAX_TIMESTAMP_MILLIS).is_ok());

        let mut reminder = daily_reminder();
        reminder.recurring_end_ts = Some(i64::MAX);
        assert_eq!(
            reminder.validate(),
            Err(InvalidReminderError::TimestampOutOfRange(i64::MAX))
        );

        let reminder = Reminder::new(
            ID::new(),
            ID::new(),
            "Hi".into(),
            i64::MIN,
            Frequency::OneTime,
            None,
            0,
        );
        assert_eq!(
            reminder.validate(),
            Err(InvalidReminderError::TimestampOutOfRange(i64::MIN))
        );

        let mut reminder = daily_reminder();
        reminder.occurrence = i64::MAX;
        assert!(reminder.set_frequency(Frequency::Monthly).is_err());
        assert_eq!(reminder.frequency, Frequency::Daily);
    }

    #[test]
    fn frequency_change_keeps_current_occurrence() {
        let mut reminder = daily_reminder().next_occurrence(0).unwrap();
        reminder.recurring_end_ts = Some(ts(2024, 3, 1));
        reminder.set_frequency(Frequency::Weekly).unwrap();
        assert_eq!(reminder.scheduled_ts(), ts(2024, 1, 2));
        let next = reminder.next_occurrence(0).unwrap();
        assert_eq!(next.send_ts, ts(2024, 1, 9));
    }

    #[test]
    fn manual_status_changes() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..Default::default()
        };
        let mut reminder = daily_reminder();
        reminder.mark_delivery_failed("down".into(), &policy, 0);
        assert_eq!(reminder.status, ReminderStatus::Failed);

        assert_eq!(
            reminder.change_status(ReminderStatus::Sent),
            Err(InvalidReminderError::InvalidStatusTransition(
                ReminderStatus::Failed,
                ReminderStatus::Sent
            ))
        );
        assert!(reminder.change_status(ReminderStatus::Pending).is_ok());
        assert_eq!(reminder.attempts, 0);
        assert_eq!(reminder.last_error, None);
        assert!(reminder.change_status(ReminderStatus::Pending).is_ok());
        assert!(reminder.change_status(ReminderStatus::Cancelled).is_ok());
    }

    #[test]
    fn retry_policy_backs_off_and_gives_up() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay_millis: 100,
            max_delay_millis: 250,
        };
        assert_eq!(policy.next_attempt_ts(1, 0), Some(100));
        assert_eq!(policy.next_attempt_ts(2, 0), Some(200));
        assert_eq!(policy.next_attempt_ts(3, 0), Some(250));
        assert_eq!(policy.next_attempt_ts(4, 0), None);

        let mut reminder = daily_reminder();
        for _ in 0..4 {
            reminder.mark_delivery_failed("down".into(), &policy, 0);
        }
        assert_eq!(reminder.status, ReminderStatus::Failed);
        assert_eq!(reminder.attempts, 4);
        assert_eq!(reminder.last_error.as_deref(), Some("down"));
    }

    #[test]
    fn previews_long_messages() {
        let mut reminder = daily_reminder();
        assert_eq!(reminder.message_preview(), "Your payment is due");
        reminder.message = "x".repeat(80);
        assert_eq!(reminder.message_preview(), format!("{}...", "x".repeat(50)));
    }
}
