use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::delete_customer::*;
use greentick_domain::{Customer, ID};
use greentick_infra::GreentickContext;

pub async fn delete_customer_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let usecase = DeleteCustomerUseCase {
        user_id,
        customer_id: path.customer_id,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|customer| HttpResponse::Ok().json(APIResponse::new(customer)))
        .map_err(GreentickError::from)
}

/// Deletes the customer together with its reminders and payments
#[derive(Debug)]
pub struct DeleteCustomerUseCase {
    pub user_id: ID,
    pub customer_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The customer with id: {}, was not found.", id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteCustomerUseCase {
    type Response = Customer;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteCustomer";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.customers.find(&self.customer_id).await {
            Some(customer) if customer.user_id == self.user_id => (),
            _ => return Err(UseCaseError::NotFound(self.customer_id)),
        };

        ctx.repos
            .reminders
            .delete_by_customer(&self.customer_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        ctx.repos
            .payments
            .delete_by_customer(&self.customer_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        ctx.repos
            .customers
            .delete(&self.customer_id)
            .await
            .ok_or(UseCaseError::NotFound(self.customer_id))
    }
}

impl PermissionBoundary for DeleteCustomerUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::DeleteCustomer]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::customer::CreateCustomerUseCase;
    use crate::shared::usecase::execute;
    use greentick_domain::{Frequency, Reminder};
    use greentick_infra::ReminderQuery;

    #[actix_web::main]
    #[test]
    async fn cascades_to_reminders() {
        let ctx = GreentickContext::create_inmemory().await;
        let user_id = ID::new();
        let customer = execute(
            CreateCustomerUseCase {
                user_id,
                name: "Asha".into(),
                phone: "+919876543210".into(),
                notes: None,
            },
            &ctx,
        )
        .await
        .unwrap();
        let reminder = Reminder::new(
            user_id,
            customer.id,
            "Hi".into(),
            0,
            Frequency::OneTime,
            None,
            0,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let usecase = DeleteCustomerUseCase {
            user_id: ID::new(),
            customer_id: customer.id,
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::NotFound(_))
        ));

        let usecase = DeleteCustomerUseCase {
            user_id,
            customer_id: customer.id,
        };
        assert!(execute(usecase, &ctx).await.is_ok());
        assert!(ctx.repos.customers.find(&customer.id).await.is_none());
        assert!(ctx
            .repos
            .reminders
            .find_by_query(ReminderQuery::new(user_id))
            .await
            .is_empty());
    }
}
