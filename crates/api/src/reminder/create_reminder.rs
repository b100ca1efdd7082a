use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::create_reminder::*;
use greentick_domain::{
    Frequency, InvalidReminderError, Reminder, TemplateError, TemplateVariables, ID,
};
use greentick_infra::GreentickContext;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateReminderUseCase {
        user_id,
        customer_id: body.customer_id,
        message: body.message,
        send_ts: body.send_ts,
        frequency: body.frequency,
        recurring_end_ts: body.recurring_end_ts,
        template_id: body.template_id,
        template_variables: body.template_variables,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(GreentickError::from)
}

#[derive(Debug, Default)]
pub struct CreateReminderUseCase {
    pub user_id: ID,
    pub customer_id: ID,
    pub message: Option<String>,
    pub send_ts: i64,
    pub frequency: Frequency,
    pub recurring_end_ts: Option<i64>,
    pub template_id: Option<String>,
    pub template_variables: Option<TemplateVariables>,
}

#[derive(Debug)]
pub enum UseCaseError {
    CustomerNotFound(ID),
    TemplateNotFound(String),
    TemplateVariables(TemplateError),
    InvalidReminder(InvalidReminderError),
    StorageError,
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::CustomerNotFound(id) => {
                Self::NotFound(format!("The customer with id: {}, was not found.", id))
            }
            UseCaseError::TemplateNotFound(id) => {
                Self::NotFound(format!("The template with id: {}, was not found.", id))
            }
            UseCaseError::TemplateVariables(e) => Self::BadClientData(e.to_string()),
            UseCaseError::InvalidReminder(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.customers.find(&self.customer_id).await {
            Some(customer) if customer.user_id == self.user_id => (),
            _ => return Err(UseCaseError::CustomerNotFound(self.customer_id)),
        }

        let message = match &self.template_id {
            Some(template_id) => {
                let template = match ctx.repos.templates.find(template_id).await {
                    Some(template) if template.is_visible_to(&self.user_id) => template,
                    _ => return Err(UseCaseError::TemplateNotFound(template_id.clone())),
                };
                template
                    .render(&self.template_variables.clone().unwrap_or_default())
                    .map_err(UseCaseError::TemplateVariables)?
            }
            None => self.message.clone().unwrap_or_default(),
        };

        let mut reminder = Reminder::new(
            self.user_id,
            self.customer_id,
            message,
            self.send_ts,
            self.frequency,
            self.recurring_end_ts,
            ctx.sys.get_timestamp_millis(),
        );
        reminder.template_id = self.template_id.clone();
        reminder.template_variables = self.template_variables.clone();
        reminder.validate().map_err(UseCaseError::InvalidReminder)?;

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map(|_| reminder)
            .map_err(|_| UseCaseError::StorageError)
    }
}

impl PermissionBoundary for CreateReminderUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::CreateReminder]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use greentick_domain::{Customer, ReminderStatus};

    async fn setup() -> (GreentickContext, Customer) {
        let ctx = GreentickContext::create_inmemory().await;
        let customer = Customer::new(ID::new(), "Asha".into(), "+919876543210".into(), None, 0);
        ctx.repos.customers.insert(&customer).await.unwrap();
        (ctx, customer)
    }

    #[actix_web::main]
    #[test]
    async fn creates_plain_reminder() {
        let (ctx, customer) = setup().await;
        let usecase = CreateReminderUseCase {
            user_id: customer.user_id,
            customer_id: customer.id,
            message: Some("Your order is ready".into()),
            send_ts: 1000,
            ..Default::default()
        };

        let reminder = execute(usecase, &ctx).await.unwrap();
        assert_eq!(reminder.status, ReminderStatus::Pending);
        assert_eq!(reminder.occurrence, 0);
        assert_eq!(reminder.series_start_ts, 1000);
        assert!(ctx.repos.reminders.find(&reminder.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn renders_message_from_template() {
        let (ctx, customer) = setup().await;
        let variables = [
            ("customer_name", "Asha"),
            ("business_name", "Green Tick"),
            ("message", "See you soon!"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<TemplateVariables>();
        let usecase = CreateReminderUseCase {
            user_id: customer.user_id,
            customer_id: customer.id,
            send_ts: 1000,
            template_id: Some("follow_up".into()),
            template_variables: Some(variables),
            ..Default::default()
        };

        let reminder = execute(usecase, &ctx).await.unwrap();
        assert_eq!(
            reminder.message,
            "Hi Asha, thank you for choosing Green Tick. See you soon!"
        );
        assert_eq!(reminder.template_id.as_deref(), Some("follow_up"));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_input() {
        let (ctx, customer) = setup().await;
        let base = || CreateReminderUseCase {
            user_id: customer.user_id,
            customer_id: customer.id,
            message: Some("Hi".into()),
            send_ts: 1000,
            ..Default::default()
        };

        let res = execute(
            CreateReminderUseCase {
                user_id: ID::new(),
                ..base()
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::CustomerNotFound(_))));

        let res = execute(
            CreateReminderUseCase {
                frequency: Frequency::Weekly,
                ..base()
            },
            &ctx,
        )
        .await;
        assert!(matches!(
            res,
            Err(UseCaseError::InvalidReminder(
                InvalidReminderError::MissingRecurringEnd(Frequency::Weekly)
            ))
        ));

        let res = execute(
            CreateReminderUseCase {
                send_ts: i64::MIN,
                ..base()
            },
            &ctx,
        )
        .await;
        assert!(matches!(
            res,
            Err(UseCaseError::InvalidReminder(
                InvalidReminderError::TimestampOutOfRange(i64::MIN)
            ))
        ));

        let res = execute(
            CreateReminderUseCase {
                message: None,
                ..base()
            },
            &ctx,
        )
        .await;
        assert!(matches!(
            res,
            Err(UseCaseError::InvalidReminder(InvalidReminderError::EmptyMessage))
        ));

        let res = execute(
            CreateReminderUseCase {
                template_id: Some("payment_reminder".into()),
                ..base()
            },
            &ctx,
        )
        .await;
        assert!(matches!(
            res,
            Err(UseCaseError::TemplateVariables(TemplateError::MissingVariables(_)))
        ));

        let res = execute(
            CreateReminderUseCase {
                template_id: Some("unknown".into()),
                ..base()
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::TemplateNotFound(_))));
    }
}
