use super::{
    parse_payment_link_event, verify_signature, IPaymentProvider, PaymentLink, PaymentLinkEvent,
    PaymentLinkRequest, WebhookError,
};
use greentick_utils::create_random_secret;
use std::sync::Mutex;

/// Webhook secret of the `InMemoryPaymentProvider`
pub const INMEMORY_WEBHOOK_SECRET: &str = "greentick_inmemory_webhook_secret";

/// Hands out fake payment links. Webhooks use the Razorpay format signed
/// with `INMEMORY_WEBHOOK_SECRET`.
pub struct InMemoryPaymentProvider {
    requests: Mutex<Vec<PaymentLinkRequest>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryPaymentProvider {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(vec![]),
            failure: Mutex::new(None),
        }
    }

    pub fn requests(&self) -> Vec<PaymentLinkRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }
}

impl Default for InMemoryPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPaymentProvider for InMemoryPaymentProvider {
    async fn create_link(&self, req: &PaymentLinkRequest) -> anyhow::Result<PaymentLink> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(anyhow::anyhow!(reason));
        }
        self.requests.lock().unwrap().push(req.clone());

        let id = format!("plink_{}", create_random_secret(14));
        Ok(PaymentLink {
            short_url: format!("https://rzp.io/i/{}", &id[6..]),
            id,
        })
    }

    fn verify(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<Option<PaymentLinkEvent>, WebhookError> {
        verify_signature(INMEMORY_WEBHOOK_SECRET, payload, signature)?;
        parse_payment_link_event(payload)
    }
}
