use super::IPaymentRepo;
use crate::repos::shared::query_structs::{sql_bound, PageQuery};
use greentick_domain::{Payment, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresPaymentRepo {
    pool: PgPool,
}

impl PostgresPaymentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PaymentRaw {
    payment_uid: Uuid,
    user_uid: Uuid,
    customer_uid: Uuid,
    amount: i64,
    currency: String,
    description: String,
    status: String,
    provider_link_id: String,
    short_url: String,
    provider_payment_id: Option<String>,
    created: i64,
    updated: i64,
}

impl TryFrom<PaymentRaw> for Payment {
    type Error = anyhow::Error;

    fn try_from(e: PaymentRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.payment_uid.into(),
            user_id: e.user_uid.into(),
            customer_id: e.customer_uid.into(),
            amount: e.amount,
            currency: e.currency,
            description: e.description,
            status: e.status.parse()?,
            provider_link_id: e.provider_link_id,
            short_url: e.short_url,
            provider_payment_id: e.provider_payment_id,
            created: e.created,
            updated: e.updated,
        })
    }
}

fn into_payments(rows: Vec<PaymentRaw>) -> Vec<Payment> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.payment_uid;
            Payment::try_from(row)
                .map_err(|e| error!("Stored payment: {} is corrupt: {:?}", id, e))
                .ok()
        })
        .collect()
}

#[async_trait::async_trait]
impl IPaymentRepo for PostgresPaymentRepo {
    async fn insert(&self, payment: &Payment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments(
                payment_uid, user_uid, customer_uid, amount, currency, description,
                status, provider_link_id, short_url, provider_payment_id, created, updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(payment.id.inner_ref())
        .bind(payment.user_id.inner_ref())
        .bind(payment.customer_id.inner_ref())
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.description)
        .bind(payment.status.as_str())
        .bind(&payment.provider_link_id)
        .bind(&payment.short_url)
        .bind(&payment.provider_payment_id)
        .bind(payment.created)
        .bind(payment.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert payment: {:?}. DB returned error: {:?}",
                payment, e
            );
            e
        })?;

        Ok(())
    }

    async fn save(&self, payment: &Payment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE payments SET
                status = $2,
                provider_payment_id = $3,
                updated = $4
            WHERE payment_uid = $1
            "#,
        )
        .bind(payment.id.inner_ref())
        .bind(payment.status.as_str())
        .bind(&payment.provider_payment_id)
        .bind(payment.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save payment: {:?}. DB returned error: {:?}",
                payment, e
            );
            e
        })?;

        Ok(())
    }

    async fn find(&self, payment_id: &ID) -> Option<Payment> {
        let res: Option<PaymentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM payments AS p
            WHERE p.payment_uid = $1
            "#,
        )
        .bind(payment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find payment with id: {:?} failed. DB returned error: {:?}",
                payment_id, e
            );
            e
        })
        .ok()?;

        into_payments(res.into_iter().collect()).pop()
    }

    async fn find_by_user(&self, query: PageQuery) -> Vec<Payment> {
        let rows: Vec<PaymentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM payments AS p
            WHERE p.user_uid = $1
                AND ($2::uuid IS NULL OR p.customer_uid = $2)
            ORDER BY p.created DESC
            LIMIT $3
            OFFSET $4
            "#,
        )
        .bind(query.user_id.inner_ref())
        .bind(query.customer_id.map(|id| *id.inner_ref()))
        .bind(sql_bound(query.limit))
        .bind(sql_bound(query.skip))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find payments with query: {:?} failed. DB returned error: {:?}",
                query, e
            );
            e
        })
        .unwrap_or_default();

        into_payments(rows)
    }

    async fn find_by_provider_link(&self, provider_link_id: &str) -> Option<Payment> {
        let res: Option<PaymentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM payments AS p
            WHERE p.provider_link_id = $1
            "#,
        )
        .bind(provider_link_id)
        .fetch_optional(&self.pool)
        .await
        .ok()?;

        into_payments(res.into_iter().collect()).pop()
    }

    async fn delete_by_customer(&self, customer_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM payments AS p
            WHERE p.customer_uid = $1
            "#,
        )
        .bind(customer_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
