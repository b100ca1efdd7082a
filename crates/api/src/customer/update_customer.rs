use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    guard::Guard,
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::update_customer::*;
use greentick_domain::{Customer, ID};
use greentick_infra::GreentickContext;

pub async fn update_customer_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = UpdateCustomerUseCase {
        user_id,
        customer_id: path.customer_id,
        name: body
            .name
            .map(|name| Guard::against_blank("name", &name))
            .transpose()?,
        phone: body
            .phone
            .map(|phone| Guard::against_invalid_phone(&phone))
            .transpose()?,
        notes: body.notes,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|customer| HttpResponse::Ok().json(APIResponse::new(customer)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct UpdateCustomerUseCase {
    pub user_id: ID,
    pub customer_id: ID,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    PhoneTaken(String),
    StorageError,
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The customer with id: {}, was not found.", id))
            }
            UseCaseError::PhoneTaken(phone) => Self::Conflict(format!(
                "A customer with the phone number: {}, already exists",
                phone
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateCustomerUseCase {
    type Response = Customer;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateCustomer";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        let mut customer = match ctx.repos.customers.find(&self.customer_id).await {
            Some(customer) if customer.user_id == self.user_id => customer,
            _ => return Err(UseCaseError::NotFound(self.customer_id)),
        };

        if let Some(phone) = &self.phone {
            if *phone != customer.phone {
                if let Some(other) = ctx
                    .repos
                    .customers
                    .find_by_phone(&self.user_id, phone)
                    .await
                {
                    if other.id != customer.id {
                        return Err(UseCaseError::PhoneTaken(phone.clone()));
                    }
                }
                customer.phone = phone.clone();
            }
        }
        if let Some(name) = &self.name {
            customer.name = name.clone();
        }
        if let Some(notes) = &self.notes {
            customer.notes = Some(notes.clone());
        }
        customer.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .customers
            .save(&customer)
            .await
            .map(|_| customer)
            .map_err(|_| UseCaseError::StorageError)
    }
}

impl PermissionBoundary for UpdateCustomerUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::UpdateCustomer]
    }
}
