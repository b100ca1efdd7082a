use super::dispatch::{dispatch, DispatchError, Dispatched};
use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::send_reminder::*;
use greentick_domain::ID;
use greentick_infra::GreentickContext;

pub async fn send_reminder_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let usecase = SendReminderUseCase {
        user_id,
        reminder_id: path.reminder_id,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.reminder, res.next_reminder)))
        .map_err(GreentickError::from)
}

/// Delivers a single reminder right away
#[derive(Debug)]
pub struct SendReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    Dispatch(DispatchError),
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The reminder with id: {}, was not found.", id))
            }
            UseCaseError::Dispatch(e) => match e {
                DispatchError::NotClaimed(id) => Self::Conflict(format!(
                    "The reminder with id: {}, is not pending. It was already sent, cancelled or is being sent right now.",
                    id
                )),
                DispatchError::CustomerNotFound(id) => {
                    Self::NotFound(format!("The customer with id: {}, was not found.", id))
                }
                DispatchError::Delivery { error, .. } => Self::UpstreamDelivery(error),
                DispatchError::StorageError => Self::InternalError,
            },
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendReminderUseCase {
    type Response = Dispatched;
    type Error = UseCaseError;

    const NAME: &'static str = "SendReminder";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        let reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id)),
        };

        dispatch(&reminder, ctx).await.map_err(UseCaseError::Dispatch)
    }
}

impl PermissionBoundary for SendReminderUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::SendReminder]
    }
}
