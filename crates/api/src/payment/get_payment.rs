use crate::error::GreentickError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::get_payment::*;
use greentick_domain::{Payment, ID};
use greentick_infra::GreentickContext;

pub async fn get_payment_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, _policy) = protect_route(&http_req, &ctx)?;

    let usecase = GetPaymentUseCase {
        user_id,
        payment_id: path.payment_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|payment| HttpResponse::Ok().json(APIResponse::new(payment)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct GetPaymentUseCase {
    pub user_id: ID,
    pub payment_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The payment with id: {}, was not found.", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetPaymentUseCase {
    type Response = Payment;
    type Error = UseCaseError;

    const NAME: &'static str = "GetPayment";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.payments.find(&self.payment_id).await {
            Some(payment) if payment.user_id == self.user_id => Ok(payment),
            _ => Err(UseCaseError::NotFound(self.payment_id)),
        }
    }
}
