use crate::error::GreentickError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::get_payments::*;
use greentick_domain::Payment;
use greentick_infra::{GreentickContext, PageQuery, DEFAULT_QUERY_LIMIT};

pub async fn get_payments_controller(
    http_req: HttpRequest,
    query: web::Query<QueryParams>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, _policy) = protect_route(&http_req, &ctx)?;

    let usecase = GetPaymentsUseCase {
        query: PageQuery {
            customer_id: query.customer_id,
            skip: query.skip.unwrap_or(0),
            limit: query.limit.unwrap_or(DEFAULT_QUERY_LIMIT),
            ..PageQuery::new(user_id)
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|payments| HttpResponse::Ok().json(APIResponse::new(payments)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct GetPaymentsUseCase {
    pub query: PageQuery,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetPaymentsUseCase {
    type Response = Vec<Payment>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetPayments";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.payments.find_by_user(self.query.clone()).await)
    }
}
