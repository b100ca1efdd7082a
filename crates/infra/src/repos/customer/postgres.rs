use super::ICustomerRepo;
use crate::repos::shared::query_structs::{sql_bound, PageQuery};
use greentick_domain::{Customer, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresCustomerRepo {
    pool: PgPool,
}

impl PostgresCustomerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CustomerRaw {
    customer_uid: Uuid,
    user_uid: Uuid,
    name: String,
    phone: String,
    notes: Option<String>,
    created: i64,
    updated: i64,
}

impl From<CustomerRaw> for Customer {
    fn from(e: CustomerRaw) -> Self {
        Self {
            id: e.customer_uid.into(),
            user_id: e.user_uid.into(),
            name: e.name,
            phone: e.phone,
            notes: e.notes,
            created: e.created,
            updated: e.updated,
        }
    }
}

#[async_trait::async_trait]
impl ICustomerRepo for PostgresCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers(customer_uid, user_uid, name, phone, notes, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(customer.id.inner_ref())
        .bind(customer.user_id.inner_ref())
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.notes)
        .bind(customer.created)
        .bind(customer.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert customer: {:?}. DB returned error: {:?}",
                customer, e
            );
            e
        })?;

        Ok(())
    }

    async fn save(&self, customer: &Customer) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE customers SET
                name = $2,
                phone = $3,
                notes = $4,
                updated = $5
            WHERE customer_uid = $1
            "#,
        )
        .bind(customer.id.inner_ref())
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.notes)
        .bind(customer.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save customer: {:?}. DB returned error: {:?}",
                customer, e
            );
            e
        })?;

        Ok(())
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        let res: Option<CustomerRaw> = sqlx::query_as(
            r#"
            SELECT * FROM customers AS c
            WHERE c.customer_uid = $1
            "#,
        )
        .bind(customer_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find customer with id: {:?} failed. DB returned error: {:?}",
                customer_id, e
            );
            e
        })
        .ok()?;

        res.map(|customer| customer.into())
    }

    async fn find_many(&self, customer_ids: &[ID]) -> Vec<Customer> {
        let ids = customer_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let customers: Vec<CustomerRaw> = sqlx::query_as(
            r#"
            SELECT * FROM customers AS c
            WHERE c.customer_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        customers.into_iter().map(|c| c.into()).collect()
    }

    async fn find_by_user(&self, query: PageQuery) -> Vec<Customer> {
        let customers: Vec<CustomerRaw> = sqlx::query_as(
            r#"
            SELECT * FROM customers AS c
            WHERE c.user_uid = $1
            ORDER BY c.created
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(query.user_id.inner_ref())
        .bind(sql_bound(query.limit))
        .bind(sql_bound(query.skip))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find customers with query: {:?} failed. DB returned error: {:?}",
                query, e
            );
            e
        })
        .unwrap_or_default();

        customers.into_iter().map(|c| c.into()).collect()
    }

    async fn find_by_phone(&self, user_id: &ID, phone: &str) -> Option<Customer> {
        let res: Option<CustomerRaw> = sqlx::query_as(
            r#"
            SELECT * FROM customers AS c
            WHERE c.user_uid = $1 AND c.phone = $2
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .ok()?;

        res.map(|customer| customer.into())
    }

    async fn delete(&self, customer_id: &ID) -> Option<Customer> {
        let res: Option<CustomerRaw> = sqlx::query_as(
            r#"
            DELETE FROM customers AS c
            WHERE c.customer_uid = $1
            RETURNING *
            "#,
        )
        .bind(customer_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete customer with id: {:?} failed. DB returned error: {:?}",
                customer_id, e
            );
            e
        })
        .ok()?;

        res.map(|customer| customer.into())
    }
}
