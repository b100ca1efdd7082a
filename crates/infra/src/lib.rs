mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, RazorpayConfig, TwilioConfig};
pub use repos::{PageQuery, ReminderQuery, Repos, DEFAULT_QUERY_LIMIT};
pub use services::messenger::*;
pub use services::payment_provider::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct GreentickContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub messenger: Arc<dyn IMessenger>,
    pub payment_provider: Arc<dyn IPaymentProvider>,
}

struct ContextParams {
    pub postgres_connection_string: Option<String>,
}

impl GreentickContext {
    async fn create(params: ContextParams) -> Self {
        let repos = match params.postgres_connection_string {
            Some(connection_string) => Repos::create_postgres(&connection_string)
                .await
                .expect("Postgres credentials must be valid"),
            None => {
                info!("DATABASE_URL not provided. Going to use inmemory repositories.");
                Repos::create_inmemory()
            }
        };
        repos
            .templates
            .seed_builtin()
            .await
            .expect("To seed the builtin templates");

        let config = Config::new();
        let messenger: Arc<dyn IMessenger> = match &config.twilio {
            Some(twilio) => Arc::new(
                TwilioMessenger::new(twilio.clone(), config.provider_timeout_secs)
                    .expect("To build the Twilio http client"),
            ),
            None => Arc::new(InMemoryMessenger::new()),
        };
        let payment_provider: Arc<dyn IPaymentProvider> = match &config.razorpay {
            Some(razorpay) => Arc::new(
                RazorpayPaymentProvider::new(razorpay.clone(), config.provider_timeout_secs)
                    .expect("To build the Razorpay http client"),
            ),
            None => Arc::new(InMemoryPaymentProvider::new()),
        };

        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            messenger,
            payment_provider,
        }
    }

    /// Context backed only by inmemory repositories and providers
    pub async fn create_inmemory() -> Self {
        let repos = Repos::create_inmemory();
        repos
            .templates
            .seed_builtin()
            .await
            .expect("To seed the builtin templates");

        Self {
            repos,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            messenger: Arc::new(InMemoryMessenger::new()),
            payment_provider: Arc::new(InMemoryPaymentProvider::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> GreentickContext {
    GreentickContext::create(ContextParams {
        postgres_connection_string: std::env::var("DATABASE_URL").ok(),
    })
    .await
}
