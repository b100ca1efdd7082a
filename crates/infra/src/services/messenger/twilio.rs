use super::{Delivery, IMessenger};
use crate::config::TwilioConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::error;

const TWILIO_API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

pub struct TwilioMessenger {
    client: Client,
    config: TwilioConfig,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<i64>,
    message: String,
}

impl TwilioMessenger {
    pub fn new(config: TwilioConfig, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn whatsapp_address(number: &str) -> String {
        if number.starts_with("whatsapp:") {
            number.to_string()
        } else {
            format!("whatsapp:{}", number)
        }
    }
}

#[async_trait::async_trait]
impl IMessenger for TwilioMessenger {
    async fn send(&self, to: &str, body: &str) -> anyhow::Result<Delivery> {
        let from = Self::whatsapp_address(&self.config.whatsapp_number);
        let to = Self::whatsapp_address(to);
        let params = [("From", from.as_str()), ("To", to.as_str()), ("Body", body)];

        let res = self
            .client
            .post(&format!(
                "{}/Accounts/{}/Messages.json",
                TWILIO_API_BASE_URL, self.config.account_sid
            ))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Twilio API POST error. Error message: {:?}", e);
                anyhow::Error::new(e)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let reason = match res.json::<ErrorResponse>().await {
                Ok(err) => match err.code {
                    Some(code) => format!("{} (code {})", err.message, code),
                    None => err.message,
                },
                Err(_) => format!("Twilio responded with status {}", status),
            };
            error!("[Rejected] Twilio did not accept the message: {}", reason);
            return Err(anyhow::anyhow!(reason));
        }

        let message = res.json::<MessageResponse>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Twilio API POST error. Error message: {:?}",
                e
            );
            anyhow::Error::new(e)
        })?;

        Ok(Delivery {
            delivery_id: message.sid,
            delivery_status: message.status,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prefixes_whatsapp_channel_once() {
        assert_eq!(
            TwilioMessenger::whatsapp_address("+919876543210"),
            "whatsapp:+919876543210"
        );
        assert_eq!(
            TwilioMessenger::whatsapp_address("whatsapp:+14155238886"),
            "whatsapp:+14155238886"
        );
    }
}
