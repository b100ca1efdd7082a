use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::delete_reminder::*;
use greentick_domain::{Reminder, ReminderStatus, ID};
use greentick_infra::GreentickContext;

pub async fn delete_reminder_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let usecase = DeleteReminderUseCase {
        user_id,
        reminder_id: path.reminder_id,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    BeingSent(ID),
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The reminder with id: {}, was not found.", id))
            }
            UseCaseError::BeingSent(id) => Self::Conflict(format!(
                "The reminder with id: {}, is being sent and can not be deleted right now.",
                id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => (),
            _ => return Err(UseCaseError::NotFound(self.reminder_id)),
        }

        // A claimed reminder belongs to its dispatcher until delivery is recorded
        if let Some(reminder) = ctx
            .repos
            .reminders
            .delete_unless_status(&self.reminder_id, ReminderStatus::Sending)
            .await
        {
            return Ok(reminder);
        }
        match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(_) => Err(UseCaseError::BeingSent(self.reminder_id)),
            None => Err(UseCaseError::NotFound(self.reminder_id)),
        }
    }
}

impl PermissionBoundary for DeleteReminderUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::DeleteReminder]
    }
}
