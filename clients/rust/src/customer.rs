use crate::base::{query_string, APIResponse, BaseClient};
use greentick_api_structs::*;
use greentick_domain::ID;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct CustomerClient {
    base: Arc<BaseClient>,
}

pub struct CreateCustomerInput {
    pub name: String,
    pub phone: String,
    pub notes: Option<String>,
}

#[derive(Default)]
pub struct GetCustomersInput {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

pub struct UpdateCustomerInput {
    pub customer_id: ID,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl CustomerClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateCustomerInput,
    ) -> APIResponse<create_customer::APIResponse> {
        let body = create_customer::RequestBody {
            name: input.name,
            phone: input.phone,
            notes: input.notes,
        };
        self.base
            .post(body, "customers".into(), StatusCode::CREATED)
            .await
    }

    pub async fn list(&self, input: GetCustomersInput) -> APIResponse<get_customers::APIResponse> {
        let query = query_string(&[
            ("skip", input.skip.map(|v| v.to_string())),
            ("limit", input.limit.map(|v| v.to_string())),
        ]);
        self.base
            .get(format!("customers{}", query), StatusCode::OK)
            .await
    }

    pub async fn get(&self, customer_id: ID) -> APIResponse<get_customer::APIResponse> {
        self.base
            .get(format!("customers/{}", customer_id), StatusCode::OK)
            .await
    }

    pub async fn update(
        &self,
        input: UpdateCustomerInput,
    ) -> APIResponse<update_customer::APIResponse> {
        let body = update_customer::RequestBody {
            name: input.name,
            phone: input.phone,
            notes: input.notes,
        };
        self.base
            .put(
                body,
                format!("customers/{}", input.customer_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, customer_id: ID) -> APIResponse<delete_customer::APIResponse> {
        self.base
            .delete(format!("customers/{}", customer_id), StatusCode::OK)
            .await
    }
}
