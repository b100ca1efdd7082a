use crate::error::GreentickError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::get_customer::*;
use greentick_domain::{Customer, ID};
use greentick_infra::GreentickContext;

pub async fn get_customer_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, _policy) = protect_route(&http_req, &ctx)?;

    let usecase = GetCustomerUseCase {
        user_id,
        customer_id: path.customer_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|customer| HttpResponse::Ok().json(APIResponse::new(customer)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct GetCustomerUseCase {
    pub user_id: ID,
    pub customer_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The customer with id: {}, was not found.", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetCustomerUseCase {
    type Response = Customer;
    type Error = UseCaseError;

    const NAME: &'static str = "GetCustomer";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.customers.find(&self.customer_id).await {
            Some(customer) if customer.user_id == self.user_id => Ok(customer),
            _ => Err(UseCaseError::NotFound(self.customer_id)),
        }
    }
}
