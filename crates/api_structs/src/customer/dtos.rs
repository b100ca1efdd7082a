use greentick_domain::{Customer, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDTO {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub phone: String,
    pub notes: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl CustomerDTO {
    pub fn new(customer: Customer) -> Self {
        Self {
            id: customer.id,
            user_id: customer.user_id,
            name: customer.name,
            phone: customer.phone,
            notes: customer.notes,
            created: customer.created,
            updated: customer.updated,
        }
    }
}
