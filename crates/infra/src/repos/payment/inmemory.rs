use super::IPaymentRepo;
use crate::repos::shared::{inmemory_repo::*, query_structs::PageQuery};
use greentick_domain::{Payment, ID};
use std::cmp::Reverse;

pub struct InMemoryPaymentRepo {
    payments: std::sync::Mutex<Vec<Payment>>,
}

impl InMemoryPaymentRepo {
    pub fn new() -> Self {
        Self {
            payments: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IPaymentRepo for InMemoryPaymentRepo {
    async fn insert(&self, payment: &Payment) -> anyhow::Result<()> {
        insert(payment, &self.payments);
        Ok(())
    }

    async fn save(&self, payment: &Payment) -> anyhow::Result<()> {
        save(payment, &self.payments);
        Ok(())
    }

    async fn find(&self, payment_id: &ID) -> Option<Payment> {
        find(payment_id, &self.payments)
    }

    async fn find_by_user(&self, query: PageQuery) -> Vec<Payment> {
        let mut payments = find_by(&self.payments, |p| {
            p.user_id == query.user_id && query.customer_id.map_or(true, |c| p.customer_id == c)
        });
        payments.sort_by_key(|p| Reverse(p.created));
        paginate(payments, query.skip, query.limit)
    }

    async fn find_by_provider_link(&self, provider_link_id: &str) -> Option<Payment> {
        find_by(&self.payments, |p| p.provider_link_id == provider_link_id)
            .into_iter()
            .next()
    }

    async fn delete_by_customer(&self, customer_id: &ID) -> anyhow::Result<()> {
        find_and_delete_by(&self.payments, |p| p.customer_id == *customer_id);
        Ok(())
    }
}
