use crate::base::{query_string, APIResponse, BaseClient};
use greentick_api_structs::*;
use greentick_domain::{Frequency, ReminderStatus, TemplateVariables, ID};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

#[derive(Default)]
pub struct CreateReminderInput {
    pub customer_id: ID,
    pub message: Option<String>,
    pub send_ts: i64,
    pub frequency: Frequency,
    pub recurring_end_ts: Option<i64>,
    pub template_id: Option<String>,
    pub template_variables: Option<TemplateVariables>,
}

#[derive(Default)]
pub struct GetRemindersInput {
    pub status: Option<ReminderStatus>,
    pub customer_id: Option<ID>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Default)]
pub struct UpdateReminderInput {
    pub reminder_id: ID,
    pub message: Option<String>,
    pub send_ts: Option<i64>,
    pub customer_id: Option<ID>,
    pub frequency: Option<Frequency>,
    pub recurring_end_ts: Option<i64>,
    pub template_id: Option<String>,
    pub template_variables: Option<TemplateVariables>,
    pub status: Option<ReminderStatus>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            customer_id: input.customer_id,
            message: input.message,
            send_ts: input.send_ts,
            frequency: input.frequency,
            recurring_end_ts: input.recurring_end_ts,
            template_id: input.template_id,
            template_variables: input.template_variables,
        };
        self.base
            .post(body, "reminders".into(), StatusCode::CREATED)
            .await
    }

    pub async fn list(&self, input: GetRemindersInput) -> APIResponse<get_reminders::APIResponse> {
        let query = query_string(&[
            ("status", input.status.map(|s| s.to_string())),
            ("customerId", input.customer_id.map(|id| id.to_string())),
            ("startTs", input.start_ts.map(|ts| ts.to_string())),
            ("endTs", input.end_ts.map(|ts| ts.to_string())),
            ("skip", input.skip.map(|v| v.to_string())),
            ("limit", input.limit.map(|v| v.to_string())),
        ]);
        self.base
            .get(format!("reminders{}", query), StatusCode::OK)
            .await
    }

    pub async fn get(&self, reminder_id: ID) -> APIResponse<get_reminder::APIResponse> {
        self.base
            .get(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn update(
        &self,
        input: UpdateReminderInput,
    ) -> APIResponse<update_reminder::APIResponse> {
        let body = update_reminder::RequestBody {
            message: input.message,
            send_ts: input.send_ts,
            customer_id: input.customer_id,
            frequency: input.frequency,
            recurring_end_ts: input.recurring_end_ts,
            template_id: input.template_id,
            template_variables: input.template_variables,
            status: input.status,
        };
        self.base
            .put(
                body,
                format!("reminders/{}", input.reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, reminder_id: ID) -> APIResponse<delete_reminder::APIResponse> {
        self.base
            .delete(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn send(&self, reminder_id: ID) -> APIResponse<send_reminder::APIResponse> {
        self.base
            .post(
                (),
                format!("reminders/{}/send", reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn send_pending(&self) -> APIResponse<send_pending_reminders::APIResponse> {
        self.base
            .post((), "reminders/send-pending".into(), StatusCode::OK)
            .await
    }
}
