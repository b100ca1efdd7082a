use super::ICustomerRepo;
use crate::repos::shared::{inmemory_repo::*, query_structs::PageQuery};
use greentick_domain::{Customer, ID};

pub struct InMemoryCustomerRepo {
    customers: std::sync::Mutex<Vec<Customer>>,
}

impl InMemoryCustomerRepo {
    pub fn new() -> Self {
        Self {
            customers: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ICustomerRepo for InMemoryCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        insert(customer, &self.customers);
        Ok(())
    }

    async fn save(&self, customer: &Customer) -> anyhow::Result<()> {
        save(customer, &self.customers);
        Ok(())
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        find(customer_id, &self.customers)
    }

    async fn find_many(&self, customer_ids: &[ID]) -> Vec<Customer> {
        find_by(&self.customers, |c| customer_ids.contains(&c.id))
    }

    async fn find_by_user(&self, query: PageQuery) -> Vec<Customer> {
        let mut customers = find_by(&self.customers, |c| c.user_id == query.user_id);
        customers.sort_by_key(|c| c.created);
        paginate(customers, query.skip, query.limit)
    }

    async fn find_by_phone(&self, user_id: &ID, phone: &str) -> Option<Customer> {
        find_by(&self.customers, |c| c.user_id == *user_id && c.phone == phone)
            .into_iter()
            .next()
    }

    async fn delete(&self, customer_id: &ID) -> Option<Customer> {
        delete(customer_id, &self.customers)
    }
}
