use crate::dtos::{FailedReminderDTO, ReminderDTO, SentReminderDTO};
use greentick_domain::{Frequency, Reminder, ReminderStatus, TemplateVariables, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub customer_id: ID,
        /// Required unless `template_id` is given
        #[serde(default)]
        pub message: Option<String>,
        pub send_ts: i64,
        #[serde(default)]
        pub frequency: Frequency,
        #[serde(default)]
        pub recurring_end_ts: Option<i64>,
        #[serde(default)]
        pub template_id: Option<String>,
        #[serde(default)]
        pub template_variables: Option<TemplateVariables>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub status: Option<ReminderStatus>,
        pub customer_id: Option<ID>,
        pub start_ts: Option<i64>,
        pub end_ts: Option<i64>,
        pub skip: Option<usize>,
        pub limit: Option<usize>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod update_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default)]
        pub send_ts: Option<i64>,
        #[serde(default)]
        pub customer_id: Option<ID>,
        #[serde(default)]
        pub frequency: Option<Frequency>,
        #[serde(default)]
        pub recurring_end_ts: Option<i64>,
        #[serde(default)]
        pub template_id: Option<String>,
        #[serde(default)]
        pub template_variables: Option<TemplateVariables>,
        #[serde(default)]
        pub status: Option<ReminderStatus>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod send_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminder: ReminderDTO,
        /// Next occurrence of the series, created on delivery
        pub next_reminder: Option<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminder: Reminder, next_reminder: Option<Reminder>) -> Self {
            Self {
                reminder: ReminderDTO::new(reminder),
                next_reminder: next_reminder.map(ReminderDTO::new),
            }
        }
    }
}

pub mod send_pending_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub sent_reminders: Vec<SentReminderDTO>,
        pub failed_reminders: Vec<FailedReminderDTO>,
    }
}
