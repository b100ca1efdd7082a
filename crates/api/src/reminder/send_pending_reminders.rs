use super::dispatch::{dispatch, DispatchError};
use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::dtos::{FailedReminderDTO, SentReminderDTO};
use greentick_api_structs::send_pending_reminders::*;
use greentick_domain::{ReminderStatus, ID};
use greentick_infra::{GreentickContext, ReminderQuery};
use tracing::{debug, info};

pub async fn send_pending_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let usecase = SendPendingRemindersUseCase {
        user_id: Some(user_id),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(GreentickError::from)
}

/// Dispatches the reminders that are due. Scoped to a single user when
/// `user_id` is set, otherwise the due reminders of every user are sent.
#[derive(Debug)]
pub struct SendPendingRemindersUseCase {
    pub user_id: Option<ID>,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendPendingRemindersUseCase {
    type Response = APIResponse;
    type Error = UseCaseError;

    const NAME: &'static str = "SendPendingReminders";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let limit = ctx.config.send_pending_batch_limit;
        let due = match self.user_id {
            Some(user_id) => {
                ctx.repos
                    .reminders
                    .find_by_query(ReminderQuery::due(user_id, now, limit))
                    .await
            }
            None => ctx.repos.reminders.find_due(now, limit).await,
        };

        let mut sent_reminders = Vec::new();
        let mut failed_reminders = Vec::new();
        for reminder in due {
            match dispatch(&reminder, ctx).await {
                Ok(res) => sent_reminders.push(SentReminderDTO {
                    reminder_id: res.reminder.id,
                    delivery_id: res.reminder.delivery_id.clone().unwrap_or_default(),
                    customer_name: res.customer.name,
                    phone: res.customer.phone,
                    message_preview: res.reminder.message_preview(),
                    next_reminder_id: res.next_reminder.map(|r| r.id),
                }),
                Err(DispatchError::NotClaimed(id)) => {
                    debug!("Reminder {} was claimed by another dispatcher", id);
                }
                Err(DispatchError::Delivery { reminder, error }) => {
                    failed_reminders.push(FailedReminderDTO {
                        reminder_id: reminder.id,
                        error,
                        retry_ts: match reminder.status {
                            ReminderStatus::Pending => Some(reminder.send_ts),
                            _ => None,
                        },
                    })
                }
                Err(e) => failed_reminders.push(FailedReminderDTO {
                    reminder_id: reminder.id,
                    error: e.to_string(),
                    retry_ts: None,
                }),
            }
        }

        if !sent_reminders.is_empty() || !failed_reminders.is_empty() {
            info!(
                "Dispatched due reminders. Sent: {}, failed: {}",
                sent_reminders.len(),
                failed_reminders.len()
            );
        }

        Ok(APIResponse {
            sent_reminders,
            failed_reminders,
        })
    }
}

impl PermissionBoundary for SendPendingRemindersUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::SendReminder]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use greentick_domain::{Customer, Frequency, Reminder};
    use greentick_infra::{InMemoryMessenger, StaticTimeSys};
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000_000;

    async fn setup() -> (GreentickContext, Arc<InMemoryMessenger>) {
        let mut ctx = GreentickContext::create_inmemory().await;
        let messenger = Arc::new(InMemoryMessenger::new());
        ctx.messenger = messenger.clone();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        (ctx, messenger)
    }

    async fn insert(
        ctx: &GreentickContext,
        customer: &Customer,
        message: &str,
        send_ts: i64,
    ) -> Reminder {
        let reminder = Reminder::new(
            customer.user_id,
            customer.id,
            message.into(),
            send_ts,
            Frequency::OneTime,
            None,
            0,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    async fn customer(ctx: &GreentickContext, user_id: ID, phone: &str) -> Customer {
        let customer = Customer::new(user_id, "Ravi".into(), phone.into(), None, 0);
        ctx.repos.customers.insert(&customer).await.unwrap();
        customer
    }

    #[actix_web::main]
    #[test]
    async fn sends_only_due_reminders_of_the_user() {
        let (ctx, messenger) = setup().await;
        let user_id = ID::new();
        let ravi = customer(&ctx, user_id, "+919876543210").await;
        let other = customer(&ctx, ID::new(), "+919876543211").await;

        let long_message = "x".repeat(60);
        let due_long = insert(&ctx, &ravi, &long_message, NOW - 20).await;
        let due_short = insert(&ctx, &ravi, "Your payment is due", NOW).await;
        let future = insert(&ctx, &ravi, "Later", NOW + 10).await;
        let other_due = insert(&ctx, &other, "Not yours", NOW - 10).await;

        let res = execute(
            SendPendingRemindersUseCase {
                user_id: Some(user_id),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(res.sent_reminders.len(), 2);
        assert!(res.failed_reminders.is_empty());
        let sent = &res.sent_reminders[0];
        assert_eq!(sent.reminder_id, due_long.id);
        assert_eq!(sent.customer_name, "Ravi");
        assert_eq!(sent.phone, "+919876543210");
        assert_eq!(sent.message_preview, format!("{}...", "x".repeat(50)));
        assert!(sent.next_reminder_id.is_none());
        assert_eq!(res.sent_reminders[1].reminder_id, due_short.id);
        assert_eq!(res.sent_reminders[1].message_preview, "Your payment is due");
        assert_eq!(messenger.sent_messages().len(), 2);

        for id in [future.id, other_due.id] {
            let reminder = ctx.repos.reminders.find(&id).await.unwrap();
            assert_eq!(reminder.status, ReminderStatus::Pending);
        }

        let res = execute(SendPendingRemindersUseCase { user_id: None }, &ctx)
            .await
            .unwrap();
        assert_eq!(res.sent_reminders.len(), 1);
        assert_eq!(res.sent_reminders[0].reminder_id, other_due.id);
    }

    #[actix_web::main]
    #[test]
    async fn reports_failed_deliveries() {
        let (ctx, messenger) = setup().await;
        let ravi = customer(&ctx, ID::new(), "+919876543210").await;
        let reminder = insert(&ctx, &ravi, "Your payment is due", NOW).await;
        messenger.fail_with("Invalid destination");

        let res = execute(
            SendPendingRemindersUseCase {
                user_id: Some(ravi.user_id),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(res.sent_reminders.is_empty());
        assert_eq!(res.failed_reminders.len(), 1);
        let failed = &res.failed_reminders[0];
        assert_eq!(failed.reminder_id, reminder.id);
        assert_eq!(failed.error, "Invalid destination");
        assert_eq!(
            failed.retry_ts,
            ctx.config.retry_policy.next_attempt_ts(1, NOW)
        );

        // The retry is not due yet
        messenger.recover();
        let res = execute(
            SendPendingRemindersUseCase {
                user_id: Some(ravi.user_id),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(res.sent_reminders.is_empty());
        assert!(res.failed_reminders.is_empty());
    }
}
