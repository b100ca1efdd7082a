use crate::dtos::PaymentDTO;
use greentick_domain::{Payment, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment: PaymentDTO,
}

impl PaymentResponse {
    pub fn new(payment: Payment) -> Self {
        Self {
            payment: PaymentDTO::new(payment),
        }
    }
}

pub mod create_payment {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub customer_id: ID,
        /// Minor currency units, e.g. paise
        pub amount: i64,
        #[serde(default)]
        pub description: Option<String>,
    }

    pub type APIResponse = PaymentResponse;
}

pub mod get_payments {
    use super::*;

    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub customer_id: Option<ID>,
        pub skip: Option<usize>,
        pub limit: Option<usize>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub payments: Vec<PaymentDTO>,
    }

    impl APIResponse {
        pub fn new(payments: Vec<Payment>) -> Self {
            Self {
                payments: payments.into_iter().map(PaymentDTO::new).collect(),
            }
        }
    }
}

pub mod get_payment {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub payment_id: ID,
    }

    pub type APIResponse = PaymentResponse;
}

pub mod payment_webhook {
    use super::*;

    /// Header carrying the hex encoded HMAC-SHA256 of the body
    pub const SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Whether a payment changed status because of this delivery
        pub updated: bool,
    }
}
