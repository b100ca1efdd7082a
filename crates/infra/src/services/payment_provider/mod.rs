mod inmemory;
mod razorpay;

use greentick_domain::PaymentStatus;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

pub use inmemory::{InMemoryPaymentProvider, INMEMORY_WEBHOOK_SECRET};
pub use razorpay::RazorpayPaymentProvider;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLinkRequest {
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub customer_name: String,
    pub customer_phone: String,
    /// Our payment id, echoed back by the provider
    pub reference_id: String,
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLink {
    pub id: String,
    pub short_url: String,
}

/// Status change of a payment link reported by a webhook
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLinkEvent {
    pub link_id: String,
    pub status: PaymentStatus,
    pub provider_payment_id: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WebhookError {
    #[error("Webhook signature is invalid")]
    InvalidSignature,
    #[error("Webhook payload is malformed: {0}")]
    MalformedPayload(String),
}

#[async_trait::async_trait]
pub trait IPaymentProvider: Send + Sync {
    async fn create_link(&self, req: &PaymentLinkRequest) -> anyhow::Result<PaymentLink>;
    /// Checks the signature of a webhook delivery and parses it. Events that
    /// do not concern payment links yield `None`.
    fn verify(&self, payload: &[u8], signature: &str)
        -> Result<Option<PaymentLinkEvent>, WebhookError>;
}

type HmacSha256 = Hmac<Sha256>;

/// Hex encoded HMAC-SHA256 of `payload`, the format of the
/// `X-Razorpay-Signature` header
pub fn sign_webhook(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> Result<(), WebhookError> {
    let signature = hex::decode(signature.trim()).map_err(|_| WebhookError::InvalidSignature)?;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| WebhookError::InvalidSignature)?;
    mac.update(payload);
    mac.verify_slice(&signature)
        .map_err(|_| WebhookError::InvalidSignature)
}

#[derive(Debug, Deserialize)]
struct WebhookBody {
    event: String,
    #[serde(default)]
    payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookPayload {
    payment_link: Option<EntityWrapper<LinkEntity>>,
    payment: Option<EntityWrapper<PaymentEntity>>,
}

#[derive(Debug, Deserialize)]
struct EntityWrapper<T> {
    entity: T,
}

#[derive(Debug, Deserialize)]
struct LinkEntity {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PaymentEntity {
    id: String,
}

/// Parses a Razorpay `payment_link.*` webhook body
fn parse_payment_link_event(payload: &[u8]) -> Result<Option<PaymentLinkEvent>, WebhookError> {
    let body: WebhookBody = serde_json::from_slice(payload)
        .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

    let status = match body.event.as_str() {
        "payment_link.paid" => PaymentStatus::Paid,
        "payment_link.cancelled" => PaymentStatus::Cancelled,
        "payment_link.expired" => PaymentStatus::Expired,
        "payment_link.failed" => PaymentStatus::Failed,
        _ => return Ok(None),
    };
    let link = body.payload.payment_link.ok_or_else(|| {
        WebhookError::MalformedPayload(format!("Event {} without payment link", body.event))
    })?;

    Ok(Some(PaymentLinkEvent {
        link_id: link.entity.id,
        status,
        provider_payment_id: body.payload.payment.map(|p| p.entity.id),
    }))
}
