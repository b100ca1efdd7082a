use crate::error::GreentickError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::get_reminders::*;
use greentick_domain::Reminder;
use greentick_infra::{GreentickContext, ReminderQuery, DEFAULT_QUERY_LIMIT};

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    query: web::Query<QueryParams>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, _policy) = protect_route(&http_req, &ctx)?;

    let query = query.0;
    let usecase = GetRemindersUseCase {
        query: ReminderQuery {
            status: query.status,
            customer_id: query.customer_id,
            start_ts: query.start_ts,
            end_ts: query.end_ts,
            skip: query.skip.unwrap_or(0),
            limit: query.limit.unwrap_or(DEFAULT_QUERY_LIMIT),
            ..ReminderQuery::new(user_id)
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub query: ReminderQuery,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidTimespan(i64, i64),
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTimespan(start, end) => Self::BadClientData(format!(
                "The provided start_ts: {} is after the end_ts: {}",
                start, end
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        if let (Some(start), Some(end)) = (self.query.start_ts, self.query.end_ts) {
            if start > end {
                return Err(UseCaseError::InvalidTimespan(start, end));
            }
        }
        Ok(ctx.repos.reminders.find_by_query(self.query.clone()).await)
    }
}
