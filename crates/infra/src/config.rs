use greentick_domain::RetryPolicy;
use greentick_utils::create_random_secret;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to verify the HS256 signed bearer tokens of users
    pub jwt_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// How often the background job dispatches due reminders
    pub send_reminders_interval_secs: u64,
    /// Upper bound of due reminders dispatched by one send-pending run
    pub send_pending_batch_limit: usize,
    /// Backoff applied when the messaging provider rejects a reminder
    pub retry_policy: RetryPolicy,
    /// Timeout for every request made to the messaging or payment provider
    pub provider_timeout_secs: u64,
    pub twilio: Option<TwilioConfig>,
    pub razorpay: Option<RazorpayConfig>,
    /// Where the payment provider redirects customers after paying
    pub payment_callback_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender, e.g. "whatsapp:+14155238886"
    pub whatsapp_number: String,
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
}

fn parse_env<T: FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn env_group<const N: usize>(names: [&str; N]) -> Option<[String; N]> {
    let mut values: [String; N] = std::array::from_fn(|_| String::new());
    for (i, name) in names.iter().enumerate() {
        values[i] = std::env::var(name).ok().filter(|v| !v.is_empty())?;
    }
    Some(values)
}

impl Config {
    pub fn new() -> Self {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find JWT_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(32);
                info!("Secret for signing user tokens was generated and set to: {}", secret);
                secret
            }
        };
        let port = parse_env("PORT", 5000);

        let retry_policy = RetryPolicy {
            max_attempts: parse_env("REMINDER_MAX_ATTEMPTS", 3_i64).max(1),
            base_delay_millis: parse_env("REMINDER_RETRY_BASE_DELAY_SECS", 60_i64) * 1000,
            max_delay_millis: 1000 * 60 * 60, // 1 hour
        };

        let twilio = env_group([
            "TWILIO_ACCOUNT_SID",
            "TWILIO_AUTH_TOKEN",
            "TWILIO_WHATSAPP_NUMBER",
        ])
        .map(|[account_sid, auth_token, whatsapp_number]| TwilioConfig {
            account_sid,
            auth_token,
            whatsapp_number,
        });
        if twilio.is_none() {
            info!("Twilio credentials not provided. Reminders will only be recorded in memory.");
        }

        let razorpay = env_group([
            "RAZORPAY_KEY_ID",
            "RAZORPAY_KEY_SECRET",
            "RAZORPAY_WEBHOOK_SECRET",
        ])
        .map(|[key_id, key_secret, webhook_secret]| RazorpayConfig {
            key_id,
            key_secret,
            webhook_secret,
        });
        if razorpay.is_none() {
            info!("Razorpay credentials not provided. Going to use an inmemory payment provider.");
        }

        let payment_callback_url = match std::env::var("PAYMENT_CALLBACK_URL") {
            Ok(callback) => match url::Url::parse(&callback) {
                Ok(_) => Some(callback),
                Err(_) => {
                    warn!("The given PAYMENT_CALLBACK_URL: {} is not a valid url, ignoring it.", callback);
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            jwt_secret,
            port,
            send_reminders_interval_secs: parse_env("SEND_REMINDERS_INTERVAL_SECS", 60_u64).max(1),
            send_pending_batch_limit: parse_env("SEND_PENDING_BATCH_LIMIT", 100_usize),
            retry_policy,
            provider_timeout_secs: parse_env("PROVIDER_TIMEOUT_SECS", 10_u64),
            twilio,
            razorpay,
            payment_callback_url,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
