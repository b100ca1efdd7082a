mod inmemory;
mod postgres;

use crate::repos::shared::query_structs::PageQuery;
use greentick_domain::{Customer, ID};
pub use inmemory::InMemoryCustomerRepo;
pub use postgres::PostgresCustomerRepo;

#[async_trait::async_trait]
pub trait ICustomerRepo: Send + Sync {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()>;
    async fn save(&self, customer: &Customer) -> anyhow::Result<()>;
    async fn find(&self, customer_id: &ID) -> Option<Customer>;
    async fn find_many(&self, customer_ids: &[ID]) -> Vec<Customer>;
    /// Customers of a user ordered by creation time
    async fn find_by_user(&self, query: PageQuery) -> Vec<Customer>;
    async fn find_by_phone(&self, user_id: &ID, phone: &str) -> Option<Customer>;
    async fn delete(&self, customer_id: &ID) -> Option<Customer>;
}
