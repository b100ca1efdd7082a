mod inmemory;
mod postgres;

use greentick_domain::{Template, ID};
pub use inmemory::InMemoryTemplateRepo;
pub use postgres::PostgresTemplateRepo;

#[async_trait::async_trait]
pub trait ITemplateRepo: Send + Sync {
    async fn insert(&self, template: &Template) -> anyhow::Result<()>;
    async fn save(&self, template: &Template) -> anyhow::Result<()>;
    async fn find(&self, template_id: &str) -> Option<Template>;
    /// Global templates followed by the templates owned by the user
    async fn find_visible(&self, user_id: &ID) -> Vec<Template>;
    /// Inserts the built in catalog, keeping templates that already exist
    async fn seed_builtin(&self) -> anyhow::Result<()>;
}
