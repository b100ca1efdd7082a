use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    guard::Guard,
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::create_customer::*;
use greentick_domain::{Customer, ID};
use greentick_infra::GreentickContext;

pub async fn create_customer_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateCustomerUseCase {
        user_id,
        name: Guard::against_blank("name", &body.name)?,
        phone: Guard::against_invalid_phone(&body.phone)?,
        notes: body.notes,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|customer| HttpResponse::Created().json(APIResponse::new(customer)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct CreateCustomerUseCase {
    pub user_id: ID,
    pub name: String,
    /// Normalized phone number
    pub phone: String,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    PhoneTaken(String),
    StorageError,
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::PhoneTaken(phone) => Self::Conflict(format!(
                "A customer with the phone number: {}, already exists",
                phone
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateCustomerUseCase {
    type Response = Customer;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateCustomer";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        if ctx
            .repos
            .customers
            .find_by_phone(&self.user_id, &self.phone)
            .await
            .is_some()
        {
            return Err(UseCaseError::PhoneTaken(self.phone.clone()));
        }

        let customer = Customer::new(
            self.user_id,
            self.name.clone(),
            self.phone.clone(),
            self.notes.clone(),
            ctx.sys.get_timestamp_millis(),
        );

        ctx.repos
            .customers
            .insert(&customer)
            .await
            .map(|_| customer)
            .map_err(|_| UseCaseError::StorageError)
    }
}

impl PermissionBoundary for CreateCustomerUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::CreateCustomer]
    }
}
