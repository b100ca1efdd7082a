use crate::error::GreentickError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::payment_webhook::*;
use greentick_infra::{GreentickContext, WebhookError};
use tracing::{info, warn};

pub async fn payment_webhook_controller(
    http_req: HttpRequest,
    body: web::Bytes,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let signature = http_req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            GreentickError::Unauthorized(format!("Missing the {} header", SIGNATURE_HEADER))
        })?
        .to_string();

    let usecase = PaymentWebhookUseCase {
        payload: body.to_vec(),
        signature,
    };

    execute(usecase, &ctx)
        .await
        .map(|updated| HttpResponse::Ok().json(APIResponse { updated }))
        .map_err(GreentickError::from)
}

/// Reconciles a payment with a status change reported by the payment
/// provider. Replayed deliveries leave the payment untouched.
#[derive(Debug)]
pub struct PaymentWebhookUseCase {
    pub payload: Vec<u8>,
    pub signature: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidWebhook(WebhookError),
    StorageError,
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidWebhook(WebhookError::InvalidSignature) => {
                Self::Unauthorized(WebhookError::InvalidSignature.to_string())
            }
            UseCaseError::InvalidWebhook(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for PaymentWebhookUseCase {
    /// Whether a payment changed
    type Response = bool;
    type Error = UseCaseError;

    const NAME: &'static str = "PaymentWebhook";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        let event = match ctx
            .payment_provider
            .verify(&self.payload, &self.signature)
            .map_err(UseCaseError::InvalidWebhook)?
        {
            Some(event) => event,
            None => return Ok(false),
        };

        let mut payment = match ctx
            .repos
            .payments
            .find_by_provider_link(&event.link_id)
            .await
        {
            Some(payment) => payment,
            None => {
                warn!("Received a webhook for the unknown payment link: {}", event.link_id);
                return Ok(false);
            }
        };

        if !payment.reconcile(
            event.status,
            event.provider_payment_id,
            ctx.sys.get_timestamp_millis(),
        ) {
            return Ok(false);
        }
        ctx.repos
            .payments
            .save(&payment)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!("Payment {} is now {}", payment.id, payment.status);

        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use greentick_domain::{Customer, Payment, PaymentStatus, ID};
    use greentick_infra::{sign_webhook, INMEMORY_WEBHOOK_SECRET};

    fn paid_event(link_id: &str) -> Vec<u8> {
        format!(
            r#"{{"event":"payment_link.paid","payload":{{"payment_link":{{"entity":{{"id":"{}","status":"paid"}}}},"payment":{{"entity":{{"id":"pay_29QQoUBi66xm2f"}}}}}}}}"#,
            link_id
        )
        .into_bytes()
    }

    fn usecase(payload: Vec<u8>) -> PaymentWebhookUseCase {
        PaymentWebhookUseCase {
            signature: sign_webhook(INMEMORY_WEBHOOK_SECRET, &payload),
            payload,
        }
    }

    #[actix_web::main]
    #[test]
    async fn reconciles_payment_once() {
        let ctx = GreentickContext::create_inmemory().await;
        let customer = Customer::new(ID::new(), "Asha".into(), "+919876543210".into(), None, 0);
        ctx.repos.customers.insert(&customer).await.unwrap();
        let payment = Payment::new(
            customer.user_id,
            customer.id,
            50000,
            "Invoice #12".into(),
            "plink_Ek8fGhIjKlMnOp".into(),
            "https://rzp.io/i/Ek8fGhIjKlMnOp".into(),
            0,
        );
        ctx.repos.payments.insert(&payment).await.unwrap();

        let updated = execute(usecase(paid_event(&payment.provider_link_id)), &ctx)
            .await
            .unwrap();
        assert!(updated);
        let stored = ctx.repos.payments.find(&payment.id).await.unwrap();
        assert_eq!(stored.status, PaymentStatus::Paid);
        assert_eq!(stored.provider_payment_id.as_deref(), Some("pay_29QQoUBi66xm2f"));

        let updated = execute(usecase(paid_event(&payment.provider_link_id)), &ctx)
            .await
            .unwrap();
        assert!(!updated);

        let updated = execute(usecase(paid_event("plink_unknown")), &ctx)
            .await
            .unwrap();
        assert!(!updated);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_forged_signatures() {
        let ctx = GreentickContext::create_inmemory().await;
        let usecase = PaymentWebhookUseCase {
            payload: paid_event("plink_1"),
            signature: sign_webhook("not the secret", &paid_event("plink_1")),
        };
        let err = execute(usecase, &ctx).await.unwrap_err();
        assert!(matches!(
            GreentickError::from(err),
            GreentickError::Unauthorized(_)
        ));
    }
}
