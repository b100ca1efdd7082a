use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::create_payment::*;
use greentick_domain::{Payment, DEFAULT_CURRENCY, ID};
use greentick_infra::{GreentickContext, PaymentLinkRequest};
use tracing::error;

pub async fn create_payment_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreatePaymentUseCase {
        user_id,
        customer_id: body.customer_id,
        amount: body.amount,
        description: body.description,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|payment| HttpResponse::Created().json(APIResponse::new(payment)))
        .map_err(GreentickError::from)
}

/// Requests a payment link for a customer and stores it
#[derive(Debug)]
pub struct CreatePaymentUseCase {
    pub user_id: ID,
    pub customer_id: ID,
    /// Minor currency units
    pub amount: i64,
    pub description: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidAmount(i64),
    CustomerNotFound(ID),
    Provider(String),
    StorageError,
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidAmount(amount) => Self::BadClientData(format!(
                "The amount must be a positive number of paise, got: {}",
                amount
            )),
            UseCaseError::CustomerNotFound(id) => {
                Self::NotFound(format!("The customer with id: {}, was not found.", id))
            }
            UseCaseError::Provider(e) => Self::UpstreamDelivery(e),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreatePaymentUseCase {
    type Response = Payment;
    type Error = UseCaseError;

    const NAME: &'static str = "CreatePayment";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        if self.amount <= 0 {
            return Err(UseCaseError::InvalidAmount(self.amount));
        }
        let customer = match ctx.repos.customers.find(&self.customer_id).await {
            Some(customer) if customer.user_id == self.user_id => customer,
            _ => return Err(UseCaseError::CustomerNotFound(self.customer_id)),
        };

        let payment_id = ID::new();
        let description = self
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Payment from {}", customer.name));
        let link = ctx
            .payment_provider
            .create_link(&PaymentLinkRequest {
                amount: self.amount,
                currency: DEFAULT_CURRENCY.into(),
                description: description.clone(),
                customer_name: customer.name.clone(),
                customer_phone: customer.phone.clone(),
                reference_id: payment_id.as_string(),
                callback_url: ctx.config.payment_callback_url.clone(),
            })
            .await
            .map_err(|e| {
                error!("Unable to create a payment link: {:?}", e);
                UseCaseError::Provider(e.to_string())
            })?;

        let mut payment = Payment::new(
            self.user_id,
            customer.id,
            self.amount,
            description,
            link.id,
            link.short_url,
            ctx.sys.get_timestamp_millis(),
        );
        payment.id = payment_id;

        ctx.repos
            .payments
            .insert(&payment)
            .await
            .map(|_| payment)
            .map_err(|_| UseCaseError::StorageError)
    }
}

impl PermissionBoundary for CreatePaymentUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::CreatePayment]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use greentick_domain::{Customer, PaymentStatus};
    use greentick_infra::{InMemoryPaymentProvider, PageQuery};
    use std::sync::Arc;

    async fn setup() -> (GreentickContext, Arc<InMemoryPaymentProvider>, Customer) {
        let mut ctx = GreentickContext::create_inmemory().await;
        let provider = Arc::new(InMemoryPaymentProvider::new());
        ctx.payment_provider = provider.clone();
        let customer = Customer::new(ID::new(), "Asha".into(), "+919876543210".into(), None, 0);
        ctx.repos.customers.insert(&customer).await.unwrap();
        (ctx, provider, customer)
    }

    #[actix_web::main]
    #[test]
    async fn creates_payment_link() {
        let (ctx, provider, customer) = setup().await;
        let usecase = CreatePaymentUseCase {
            user_id: customer.user_id,
            customer_id: customer.id,
            amount: 50000,
            description: Some("Invoice #12".into()),
        };

        let payment = execute(usecase, &ctx).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Created);
        assert_eq!(payment.currency, "INR");
        assert!(payment.provider_link_id.starts_with("plink_"));

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].reference_id, payment.id.as_string());
        assert_eq!(requests[0].customer_phone, customer.phone);
        assert_eq!(ctx.repos.payments.find(&payment.id).await, Some(payment));
    }

    #[actix_web::main]
    #[test]
    async fn nothing_is_stored_when_provider_fails() {
        let (ctx, provider, customer) = setup().await;
        provider.fail_with("Authentication failed");
        let usecase = CreatePaymentUseCase {
            user_id: customer.user_id,
            customer_id: customer.id,
            amount: 50000,
            description: None,
        };

        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::Provider(_))
        ));
        let payments = ctx
            .repos
            .payments
            .find_by_user(PageQuery::new(customer.user_id))
            .await;
        assert!(payments.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_requests() {
        let (ctx, provider, customer) = setup().await;
        let usecase = |user_id: ID, amount: i64| CreatePaymentUseCase {
            user_id,
            customer_id: customer.id,
            amount,
            description: None,
        };

        assert!(matches!(
            execute(usecase(customer.user_id, 0), &ctx).await,
            Err(UseCaseError::InvalidAmount(0))
        ));
        assert!(matches!(
            execute(usecase(ID::new(), 100), &ctx).await,
            Err(UseCaseError::CustomerNotFound(_))
        ));
        assert!(provider.requests().is_empty());
    }
}
