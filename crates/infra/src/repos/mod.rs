mod customer;
mod payment;
mod reminder;
mod shared;
mod template;

use customer::{ICustomerRepo, InMemoryCustomerRepo, PostgresCustomerRepo};
use payment::{IPaymentRepo, InMemoryPaymentRepo, PostgresPaymentRepo};
use reminder::{IReminderRepo, InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use template::{ITemplateRepo, InMemoryTemplateRepo, PostgresTemplateRepo};
use tracing::info;

pub use shared::query_structs::*;

#[derive(Clone)]
pub struct Repos {
    pub customers: Arc<dyn ICustomerRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub templates: Arc<dyn ITemplateRepo>,
    pub payments: Arc<dyn IPaymentRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB EXECUTING MIGRATION ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB EXECUTING MIGRATION ... [done]");

        Ok(Self {
            customers: Arc::new(PostgresCustomerRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            templates: Arc::new(PostgresTemplateRepo::new(pool.clone())),
            payments: Arc::new(PostgresPaymentRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            customers: Arc::new(InMemoryCustomerRepo::new()),
            reminders: Arc::new(InMemoryReminderRepo::new()),
            templates: Arc::new(InMemoryTemplateRepo::new()),
            payments: Arc::new(InMemoryPaymentRepo::new()),
        }
    }
}
