use greentick_domain::{Payment, PaymentStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDTO {
    pub id: ID,
    pub customer_id: ID,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub status: PaymentStatus,
    pub provider_link_id: String,
    pub short_url: String,
    pub provider_payment_id: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl PaymentDTO {
    pub fn new(payment: Payment) -> Self {
        Self {
            id: payment.id,
            customer_id: payment.customer_id,
            amount: payment.amount,
            currency: payment.currency,
            description: payment.description,
            status: payment.status,
            provider_link_id: payment.provider_link_id,
            short_url: payment.short_url,
            provider_payment_id: payment.provider_payment_id,
            created: payment.created,
            updated: payment.updated,
        }
    }
}
