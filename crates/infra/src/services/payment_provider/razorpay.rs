use super::{
    parse_payment_link_event, verify_signature, IPaymentProvider, PaymentLink, PaymentLinkEvent,
    PaymentLinkRequest, WebhookError,
};
use crate::config::RazorpayConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

const RAZORPAY_API_BASE_URL: &str = "https://api.razorpay.com/v1";

pub struct RazorpayPaymentProvider {
    client: Client,
    config: RazorpayConfig,
}

impl RazorpayPaymentProvider {
    pub fn new(config: RazorpayConfig, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[derive(Debug, Serialize)]
struct LinkCustomer<'a> {
    name: &'a str,
    contact: &'a str,
}

#[derive(Debug, Serialize)]
struct LinkNotify {
    sms: bool,
    email: bool,
}

#[derive(Debug, Serialize)]
struct CreateLinkBody<'a> {
    amount: i64,
    currency: &'a str,
    accept_partial: bool,
    description: &'a str,
    reference_id: &'a str,
    customer: LinkCustomer<'a>,
    notify: LinkNotify,
    reminder_enable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_method: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreateLinkResponse {
    id: String,
    short_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    description: String,
}

#[async_trait::async_trait]
impl IPaymentProvider for RazorpayPaymentProvider {
    async fn create_link(&self, req: &PaymentLinkRequest) -> anyhow::Result<PaymentLink> {
        let body = CreateLinkBody {
            amount: req.amount,
            currency: &req.currency,
            accept_partial: false,
            description: &req.description,
            reference_id: &req.reference_id,
            customer: LinkCustomer {
                name: &req.customer_name,
                contact: &req.customer_phone,
            },
            notify: LinkNotify {
                sms: true,
                email: false,
            },
            reminder_enable: true,
            callback_url: req.callback_url.as_deref(),
            callback_method: req.callback_url.as_ref().map(|_| "get"),
        };

        let res = self
            .client
            .post(&format!("{}/payment_links", RAZORPAY_API_BASE_URL))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] Razorpay API POST error. Error message: {:?}",
                    e
                );
                anyhow::Error::new(e)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let reason = match res.json::<ErrorResponse>().await {
                Ok(err) => format!("{}: {}", err.error.code, err.error.description),
                Err(_) => format!("Razorpay responded with status {}", status),
            };
            error!("[Rejected] Razorpay did not create the payment link: {}", reason);
            return Err(anyhow::anyhow!(reason));
        }

        let link = res.json::<CreateLinkResponse>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Razorpay API POST error. Error message: {:?}",
                e
            );
            anyhow::Error::new(e)
        })?;

        Ok(PaymentLink {
            id: link.id,
            short_url: link.short_url,
        })
    }

    fn verify(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<Option<PaymentLinkEvent>, WebhookError> {
        verify_signature(&self.config.webhook_secret, payload, signature)?;
        parse_payment_link_event(payload)
    }
}
