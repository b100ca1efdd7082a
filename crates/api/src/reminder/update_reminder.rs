use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::update_reminder::*;
use greentick_domain::{
    Frequency, InvalidReminderError, Reminder, ReminderStatus, TemplateError, TemplateVariables,
    ID,
};
use greentick_infra::GreentickContext;

pub async fn update_reminder_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = UpdateReminderUseCase {
        user_id,
        reminder_id: path.reminder_id,
        message: body.message,
        send_ts: body.send_ts,
        customer_id: body.customer_id,
        frequency: body.frequency,
        recurring_end_ts: body.recurring_end_ts,
        template_id: body.template_id,
        template_variables: body.template_variables,
        status: body.status,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(GreentickError::from)
}

#[derive(Debug, Default)]
pub struct UpdateReminderUseCase {
    pub user_id: ID,
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

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    CustomerNotFound(ID),
    TemplateNotFound(String),
    TemplateVariables(TemplateError),
    InvalidReminder(InvalidReminderError),
    BeingSent(ID),
    StorageError,
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The reminder with id: {}, was not found.", id))
            }
            UseCaseError::CustomerNotFound(id) => {
                Self::NotFound(format!("The customer with id: {}, was not found.", id))
            }
            UseCaseError::TemplateNotFound(id) => {
                Self::NotFound(format!("The template with id: {}, was not found.", id))
            }
            UseCaseError::TemplateVariables(e) => Self::BadClientData(e.to_string()),
            UseCaseError::InvalidReminder(e) => Self::BadClientData(e.to_string()),
            UseCaseError::BeingSent(id) => Self::Conflict(format!(
                "The reminder with id: {}, is being sent and can not be updated right now.",
                id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id)),
        };
        if reminder.status == ReminderStatus::Sending {
            return Err(UseCaseError::BeingSent(reminder.id));
        }
        let stored_status = reminder.status;

        if let Some(customer_id) = self.customer_id {
            match ctx.repos.customers.find(&customer_id).await {
                Some(customer) if customer.user_id == self.user_id => (),
                _ => return Err(UseCaseError::CustomerNotFound(customer_id)),
            }
            reminder.customer_id = customer_id;
        }

        if let Some(frequency) = self.frequency {
            reminder
                .set_frequency(frequency)
                .map_err(UseCaseError::InvalidReminder)?;
        }
        if let Some(recurring_end_ts) = self.recurring_end_ts {
            reminder.recurring_end_ts = Some(recurring_end_ts);
        }
        if let Some(send_ts) = self.send_ts {
            reminder
                .reschedule(send_ts)
                .map_err(UseCaseError::InvalidReminder)?;
        }
        if let Some(message) = &self.message {
            reminder.message = message.clone();
        }

        let template_changed = self.template_id.is_some() || self.template_variables.is_some();
        if let Some(template_id) = &self.template_id {
            reminder.template_id = Some(template_id.clone());
        }
        if let Some(template_variables) = &self.template_variables {
            reminder.template_variables = Some(template_variables.clone());
        }
        if template_changed {
            if let Some(template_id) = &reminder.template_id {
                let template = match ctx.repos.templates.find(template_id).await {
                    Some(template) if template.is_visible_to(&self.user_id) => template,
                    _ => return Err(UseCaseError::TemplateNotFound(template_id.clone())),
                };
                reminder.message = template
                    .render(&reminder.template_variables.clone().unwrap_or_default())
                    .map_err(UseCaseError::TemplateVariables)?;
            }
        }

        if let Some(status) = self.status {
            reminder
                .change_status(status)
                .map_err(UseCaseError::InvalidReminder)?;
        }
        reminder.validate().map_err(UseCaseError::InvalidReminder)?;
        reminder.updated = ctx.sys.get_timestamp_millis();

        // A dispatcher may have claimed the reminder since it was read
        match ctx
            .repos
            .reminders
            .save_if_status(&reminder, stored_status)
            .await
        {
            Ok(true) => Ok(reminder),
            Ok(false) => Err(UseCaseError::BeingSent(reminder.id)),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}

impl PermissionBoundary for UpdateReminderUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::UpdateReminder]
    }
}
