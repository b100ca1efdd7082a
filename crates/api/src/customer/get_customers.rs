use crate::error::GreentickError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::get_customers::*;
use greentick_domain::{Customer, ID};
use greentick_infra::{GreentickContext, PageQuery, DEFAULT_QUERY_LIMIT};

pub async fn get_customers_controller(
    http_req: HttpRequest,
    query: web::Query<QueryParams>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, _policy) = protect_route(&http_req, &ctx)?;

    let usecase = GetCustomersUseCase {
        user_id,
        skip: query.skip.unwrap_or(0),
        limit: query.limit.unwrap_or(DEFAULT_QUERY_LIMIT),
    };

    execute(usecase, &ctx)
        .await
        .map(|customers| HttpResponse::Ok().json(APIResponse::new(customers)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct GetCustomersUseCase {
    pub user_id: ID,
    pub skip: usize,
    pub limit: usize,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetCustomersUseCase {
    type Response = Vec<Customer>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetCustomers";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        let query = PageQuery {
            skip: self.skip,
            limit: self.limit,
            ..PageQuery::new(self.user_id)
        };
        Ok(ctx.repos.customers.find_by_user(query).await)
    }
}
