mod inmemory;
mod postgres;

use crate::repos::shared::query_structs::PageQuery;
use greentick_domain::{Payment, ID};
pub use inmemory::InMemoryPaymentRepo;
pub use postgres::PostgresPaymentRepo;

#[async_trait::async_trait]
pub trait IPaymentRepo: Send + Sync {
    async fn insert(&self, payment: &Payment) -> anyhow::Result<()>;
    async fn save(&self, payment: &Payment) -> anyhow::Result<()>;
    async fn find(&self, payment_id: &ID) -> Option<Payment>;
    /// Payments of a user, newest first
    async fn find_by_user(&self, query: PageQuery) -> Vec<Payment>;
    async fn find_by_provider_link(&self, provider_link_id: &str) -> Option<Payment>;
    async fn delete_by_customer(&self, customer_id: &ID) -> anyhow::Result<()>;
}
