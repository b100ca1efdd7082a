use crate::base::{query_string, APIResponse, BaseClient};
use greentick_api_structs::*;
use greentick_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentClient {
    base: Arc<BaseClient>,
}

pub struct CreatePaymentInput {
    pub customer_id: ID,
    /// Minor currency units, e.g. paise
    pub amount: i64,
    pub description: Option<String>,
}

#[derive(Default)]
pub struct GetPaymentsInput {
    pub customer_id: Option<ID>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl PaymentClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreatePaymentInput,
    ) -> APIResponse<create_payment::APIResponse> {
        let body = create_payment::RequestBody {
            customer_id: input.customer_id,
            amount: input.amount,
            description: input.description,
        };
        self.base
            .post(body, "payments".into(), StatusCode::CREATED)
            .await
    }

    pub async fn list(&self, input: GetPaymentsInput) -> APIResponse<get_payments::APIResponse> {
        let query = query_string(&[
            ("customerId", input.customer_id.map(|id| id.to_string())),
            ("skip", input.skip.map(|v| v.to_string())),
            ("limit", input.limit.map(|v| v.to_string())),
        ]);
        self.base
            .get(format!("payments{}", query), StatusCode::OK)
            .await
    }

    pub async fn get(&self, payment_id: ID) -> APIResponse<get_payment::APIResponse> {
        self.base
            .get(format!("payments/{}", payment_id), StatusCode::OK)
            .await
    }

    /// Delivers a webhook the way the payment provider does
    pub async fn webhook(
        &self,
        payload: Vec<u8>,
        signature: &str,
    ) -> APIResponse<payment_webhook::APIResponse> {
        self.base
            .post_raw(
                payload,
                &[(payment_webhook::SIGNATURE_HEADER, signature)],
                "payments/webhook".into(),
                StatusCode::OK,
            )
            .await
    }
}
