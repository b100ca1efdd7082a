use crate::dtos::CustomerDTO;
use greentick_domain::{Customer, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub customer: CustomerDTO,
}

impl CustomerResponse {
    pub fn new(customer: Customer) -> Self {
        Self {
            customer: CustomerDTO::new(customer),
        }
    }
}

pub mod create_customer {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        pub phone: String,
        #[serde(default)]
        pub notes: Option<String>,
    }

    pub type APIResponse = CustomerResponse;
}

pub mod get_customers {
    use super::*;

    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub skip: Option<usize>,
        pub limit: Option<usize>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub customers: Vec<CustomerDTO>,
    }

    impl APIResponse {
        pub fn new(customers: Vec<Customer>) -> Self {
            Self {
                customers: customers.into_iter().map(CustomerDTO::new).collect(),
            }
        }
    }
}

pub mod get_customer {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub customer_id: ID,
    }

    pub type APIResponse = CustomerResponse;
}

pub mod update_customer {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub customer_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub phone: Option<String>,
        #[serde(default)]
        pub notes: Option<String>,
    }

    pub type APIResponse = CustomerResponse;
}

pub mod delete_customer {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub customer_id: ID,
    }

    pub type APIResponse = CustomerResponse;
}
