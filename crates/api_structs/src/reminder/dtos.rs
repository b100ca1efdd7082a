use greentick_domain::{Frequency, Reminder, ReminderStatus, TemplateVariables, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub customer_id: ID,
    pub series_id: ID,
    pub occurrence: i64,
    pub message: String,
    pub send_ts: i64,
    pub status: ReminderStatus,
    pub frequency: Frequency,
    pub recurring_end_ts: Option<i64>,
    pub template_id: Option<String>,
    pub template_variables: Option<TemplateVariables>,
    pub attempts: i64,
    pub last_error: Option<String>,
    pub delivery_id: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            customer_id: reminder.customer_id,
            series_id: reminder.series_id,
            occurrence: reminder.occurrence,
            message: reminder.message,
            send_ts: reminder.send_ts,
            status: reminder.status,
            frequency: reminder.frequency,
            recurring_end_ts: reminder.recurring_end_ts,
            template_id: reminder.template_id,
            template_variables: reminder.template_variables,
            attempts: reminder.attempts,
            last_error: reminder.last_error,
            delivery_id: reminder.delivery_id,
            created: reminder.created,
            updated: reminder.updated,
        }
    }
}

/// A reminder delivered by a send-pending run
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SentReminderDTO {
    pub reminder_id: ID,
    pub delivery_id: String,
    pub customer_name: String,
    pub phone: String,
    pub message_preview: String,
    pub next_reminder_id: Option<ID>,
}

/// A reminder whose delivery failed during a send-pending run
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FailedReminderDTO {
    pub reminder_id: ID,
    pub error: String,
    /// When the next attempt is scheduled, `None` once attempts are exhausted
    pub retry_ts: Option<i64>,
}
