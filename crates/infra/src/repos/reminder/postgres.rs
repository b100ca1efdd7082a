use super::IReminderRepo;
use crate::repos::shared::query_structs::{sql_bound, ReminderQuery};
use greentick_domain::{Reminder, ReminderStatus, TemplateVariables, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Overwrites the stored row, optionally only while it is in `expected`.
    /// Returns the number of updated rows.
    async fn update(
        &self,
        reminder: &Reminder,
        expected: Option<ReminderStatus>,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE reminders SET
                series_start_ts = $2,
                message = $3,
                send_ts = $4,
                status = $5,
                frequency = $6,
                recurring_end_ts = $7,
                template_id = $8,
                template_variables = $9,
                attempts = $10,
                last_error = $11,
                delivery_id = $12,
                updated = $13,
                customer_uid = $14
            WHERE reminder_uid = $1 AND ($15::text IS NULL OR status = $15)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.series_start_ts)
        .bind(&reminder.message)
        .bind(reminder.send_ts)
        .bind(reminder.status.as_str())
        .bind(reminder.frequency.as_str())
        .bind(reminder.recurring_end_ts)
        .bind(&reminder.template_id)
        .bind(reminder.template_variables.as_ref().map(Json))
        .bind(reminder.attempts)
        .bind(&reminder.last_error)
        .bind(&reminder.delivery_id)
        .bind(reminder.updated)
        .bind(reminder.customer_id.inner_ref())
        .bind(expected.map(|status| status.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save reminder: {:?}. DB returned error: {:?}",
                reminder, e
            );
            e
        })?;

        Ok(res.rows_affected())
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    user_uid: Uuid,
    customer_uid: Uuid,
    series_uid: Uuid,
    occurrence: i64,
    series_start_ts: i64,
    message: String,
    send_ts: i64,
    status: String,
    frequency: String,
    recurring_end_ts: Option<i64>,
    template_id: Option<String>,
    template_variables: Option<Json<TemplateVariables>>,
    attempts: i64,
    last_error: Option<String>,
    delivery_id: Option<String>,
    created: i64,
    updated: i64,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(e: ReminderRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.reminder_uid.into(),
            user_id: e.user_uid.into(),
            customer_id: e.customer_uid.into(),
            series_id: e.series_uid.into(),
            occurrence: e.occurrence,
            series_start_ts: e.series_start_ts,
            message: e.message,
            send_ts: e.send_ts,
            status: e.status.parse()?,
            frequency: e.frequency.parse()?,
            recurring_end_ts: e.recurring_end_ts,
            template_id: e.template_id,
            template_variables: e.template_variables.map(|vars| vars.0),
            attempts: e.attempts,
            last_error: e.last_error,
            delivery_id: e.delivery_id,
            created: e.created,
            updated: e.updated,
        })
    }
}

fn into_reminders(rows: Vec<ReminderRaw>) -> Vec<Reminder> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.reminder_uid;
            Reminder::try_from(row)
                .map_err(|e| error!("Stored reminder: {} is corrupt: {:?}", id, e))
                .ok()
        })
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders(
                reminder_uid, user_uid, customer_uid, series_uid, occurrence,
                series_start_ts, message, send_ts, status, frequency,
                recurring_end_ts, template_id, template_variables, attempts,
                last_error, delivery_id, created, updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.user_id.inner_ref())
        .bind(reminder.customer_id.inner_ref())
        .bind(reminder.series_id.inner_ref())
        .bind(reminder.occurrence)
        .bind(reminder.series_start_ts)
        .bind(&reminder.message)
        .bind(reminder.send_ts)
        .bind(reminder.status.as_str())
        .bind(reminder.frequency.as_str())
        .bind(reminder.recurring_end_ts)
        .bind(&reminder.template_id)
        .bind(reminder.template_variables.as_ref().map(Json))
        .bind(reminder.attempts)
        .bind(&reminder.last_error)
        .bind(&reminder.delivery_id)
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert reminder: {:?}. DB returned error: {:?}",
                reminder, e
            );
            e
        })?;

        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.update(reminder, None).await?;
        Ok(())
    }

    async fn save_if_status(
        &self,
        reminder: &Reminder,
        expected: ReminderStatus,
    ) -> anyhow::Result<bool> {
        let rows = self.update(reminder, Some(expected)).await?;
        Ok(rows > 0)
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find reminder with id: {:?} failed. DB returned error: {:?}",
                reminder_id, e
            );
            e
        })
        .ok()?;

        into_reminders(res.into_iter().collect()).pop()
    }

    async fn find_by_query(&self, query: ReminderQuery) -> Vec<Reminder> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.user_uid = $1
                AND ($2::text IS NULL OR r.status = $2)
                AND ($3::uuid IS NULL OR r.customer_uid = $3)
                AND ($4::bigint IS NULL OR r.send_ts >= $4)
                AND ($5::bigint IS NULL OR r.send_ts <= $5)
            ORDER BY r.send_ts
            LIMIT $6
            OFFSET $7
            "#,
        )
        .bind(query.user_id.inner_ref())
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.customer_id.map(|id| *id.inner_ref()))
        .bind(query.start_ts)
        .bind(query.end_ts)
        .bind(sql_bound(query.limit))
        .bind(sql_bound(query.skip))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find reminders with query: {:?} failed. DB returned error: {:?}",
                query, e
            );
            e
        })
        .unwrap_or_default();

        into_reminders(rows)
    }

    async fn find_due(&self, now: i64, limit: usize) -> Vec<Reminder> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.status = 'pending' AND r.send_ts <= $1
            ORDER BY r.send_ts
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(sql_bound(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Find due reminders failed. DB returned error: {:?}", e);
            e
        })
        .unwrap_or_default();

        into_reminders(rows)
    }

    async fn delete_unless_status(
        &self,
        reminder_id: &ID,
        status: ReminderStatus,
    ) -> Option<Reminder> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            DELETE FROM reminders AS r
            WHERE r.reminder_uid = $1 AND r.status <> $2
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete reminder with id: {:?} failed. DB returned error: {:?}",
                reminder_id, e
            );
            e
        })
        .ok()?;

        into_reminders(res.into_iter().collect()).pop()
    }

    async fn delete_by_customer(&self, customer_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM reminders AS r
            WHERE r.customer_uid = $1
            "#,
        )
        .bind(customer_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn transition(
        &self,
        reminder_id: &ID,
        from: ReminderStatus,
        to: ReminderStatus,
        now: i64,
    ) -> anyhow::Result<Option<Reminder>> {
        let res: Option<ReminderRaw> = sqlx::query_as(
            r#"
            UPDATE reminders SET
                status = $3,
                updated = $4
            WHERE reminder_uid = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Transition of reminder: {:?} from {} to {} failed. DB returned error: {:?}",
                reminder_id, from, to, e
            );
            e
        })?;

        match res {
            Some(row) => Ok(Some(Reminder::try_from(row)?)),
            None => Ok(None),
        }
    }
}
