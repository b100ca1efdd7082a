mod inmemory;
mod postgres;

use crate::repos::shared::query_structs::ReminderQuery;
use greentick_domain::{Reminder, ReminderStatus, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// Saves the reminder only while the stored copy is still in `expected`.
    /// Returns `false` when the status changed in the meantime.
    async fn save_if_status(
        &self,
        reminder: &Reminder,
        expected: ReminderStatus,
    ) -> anyhow::Result<bool>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// Reminders of a single user ordered by ascending `send_ts`
    async fn find_by_query(&self, query: ReminderQuery) -> Vec<Reminder>;
    /// Due `Pending` reminders of all users, oldest first
    async fn find_due(&self, now: i64, limit: usize) -> Vec<Reminder>;
    /// Deletes the reminder unless it is currently in `status`
    async fn delete_unless_status(
        &self,
        reminder_id: &ID,
        status: ReminderStatus,
    ) -> Option<Reminder>;
    async fn delete_by_customer(&self, customer_id: &ID) -> anyhow::Result<()>;
    /// Atomically moves a reminder from `from` to `to`. Returns the updated
    /// reminder, or `None` when the reminder was not in `from` anymore.
    async fn transition(
        &self,
        reminder_id: &ID,
        from: ReminderStatus,
        to: ReminderStatus,
        now: i64,
    ) -> anyhow::Result<Option<Reminder>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_context;
    use greentick_domain::{Customer, Frequency};

    async fn insert_customer(ctx: &crate::GreentickContext, user_id: ID, phone: &str) -> Customer {
        let customer = Customer::new(user_id, "Asha".into(), phone.into(), None, 0);
        ctx.repos
            .customers
            .insert(&customer)
            .await
            .expect("To insert customer");
        customer
    }

    fn reminder(customer: &Customer, send_ts: i64) -> Reminder {
        Reminder::new(
            customer.user_id,
            customer.id,
            "Your payment is due".into(),
            send_ts,
            Frequency::OneTime,
            None,
            0,
        )
    }

    #[tokio::test]
    async fn query_is_ordered_and_filtered() {
        let ctx = setup_context().await;
        let customer = insert_customer(&ctx, ID::new(), "+919876543210").await;

        let late = reminder(&customer, 3000);
        let early = reminder(&customer, 1000);
        let mut cancelled = reminder(&customer, 2000);
        cancelled.status = ReminderStatus::Cancelled;
        for r in [&late, &early, &cancelled] {
            ctx.repos.reminders.insert(r).await.expect("To insert reminder");
        }

        let res = ctx
            .repos
            .reminders
            .find_by_query(ReminderQuery::new(customer.user_id))
            .await;
        let ids = res.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![early.id, cancelled.id, late.id]);

        let mut query = ReminderQuery::new(customer.user_id);
        query.status = Some(ReminderStatus::Pending);
        query.start_ts = Some(2000);
        let res = ctx.repos.reminders.find_by_query(query).await;
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].id, late.id);

        let res = ctx
            .repos
            .reminders
            .find_by_query(ReminderQuery::new(ID::new()))
            .await;
        assert!(res.is_empty());
    }

    #[tokio::test]
    async fn find_due_across_users() {
        let ctx = setup_context().await;
        let customer_1 = insert_customer(&ctx, ID::new(), "+919876543210").await;
        let customer_2 = insert_customer(&ctx, ID::new(), "+919876543211").await;

        let due_1 = reminder(&customer_1, 100);
        let due_2 = reminder(&customer_2, 50);
        let future = reminder(&customer_2, 10_000);
        for r in [&due_1, &due_2, &future] {
            ctx.repos.reminders.insert(r).await.expect("To insert reminder");
        }

        let due = ctx.repos.reminders.find_due(200, 10).await;
        let due_ids = due.iter().map(|r| r.id).collect::<Vec<_>>();
        assert!(due_ids.contains(&due_1.id));
        assert!(due_ids.contains(&due_2.id));
        assert!(!due_ids.contains(&future.id));

        let limited = ctx.repos.reminders.find_due(200, 1).await;
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn transition_only_succeeds_once() {
        let ctx = setup_context().await;
        let customer = insert_customer(&ctx, ID::new(), "+919876543210").await;
        let r = reminder(&customer, 100);
        ctx.repos.reminders.insert(&r).await.expect("To insert reminder");

        let claimed = ctx
            .repos
            .reminders
            .transition(&r.id, ReminderStatus::Pending, ReminderStatus::Sending, 5)
            .await
            .expect("To transition reminder")
            .expect("To claim reminder");
        assert_eq!(claimed.status, ReminderStatus::Sending);
        assert_eq!(claimed.updated, 5);

        let second = ctx
            .repos
            .reminders
            .transition(&r.id, ReminderStatus::Pending, ReminderStatus::Sending, 6)
            .await
            .expect("To transition reminder");
        assert!(second.is_none());
        assert_eq!(
            ctx.repos.reminders.find(&r.id).await.unwrap().status,
            ReminderStatus::Sending
        );
    }

    #[tokio::test]
    async fn saves_keep_customer_changes() {
        let ctx = setup_context().await;
        let customer = insert_customer(&ctx, ID::new(), "+919876543210").await;
        let other = insert_customer(&ctx, customer.user_id, "+919876543211").await;
        let mut r = reminder(&customer, 100);
        ctx.repos.reminders.insert(&r).await.expect("To insert reminder");

        r.customer_id = other.id;
        assert!(ctx
            .repos
            .reminders
            .save_if_status(&r, ReminderStatus::Pending)
            .await
            .expect("To save reminder"));
        let stored = ctx.repos.reminders.find(&r.id).await.unwrap();
        assert_eq!(stored.customer_id, other.id);

        let mut query = ReminderQuery::new(customer.user_id);
        query.customer_id = Some(other.id);
        let res = ctx.repos.reminders.find_by_query(query).await;
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].id, r.id);

        r.customer_id = customer.id;
        ctx.repos.reminders.save(&r).await.expect("To save reminder");
        let stored = ctx.repos.reminders.find(&r.id).await.unwrap();
        assert_eq!(stored.customer_id, customer.id);
    }

    #[tokio::test]
    async fn save_if_status_respects_claims() {
        let ctx = setup_context().await;
        let customer = insert_customer(&ctx, ID::new(), "+919876543210").await;
        let r = reminder(&customer, 100);
        ctx.repos.reminders.insert(&r).await.expect("To insert reminder");

        let mut edited = r.clone();
        edited.message = "Edited".into();
        assert!(ctx
            .repos
            .reminders
            .save_if_status(&edited, ReminderStatus::Pending)
            .await
            .expect("To save reminder"));

        ctx.repos
            .reminders
            .transition(&r.id, ReminderStatus::Pending, ReminderStatus::Sending, 5)
            .await
            .expect("To transition reminder");
        edited.message = "Too late".into();
        assert!(!ctx
            .repos
            .reminders
            .save_if_status(&edited, ReminderStatus::Pending)
            .await
            .expect("To save reminder"));

        let stored = ctx.repos.reminders.find(&r.id).await.unwrap();
        assert_eq!(stored.message, "Edited");
        assert_eq!(stored.status, ReminderStatus::Sending);
    }

    #[tokio::test]
    async fn delete_by_customer() {
        let ctx = setup_context().await;
        let customer = insert_customer(&ctx, ID::new(), "+919876543210").await;
        let other = insert_customer(&ctx, customer.user_id, "+919876543211").await;
        let r1 = reminder(&customer, 100);
        let r2 = reminder(&other, 100);
        ctx.repos.reminders.insert(&r1).await.expect("To insert reminder");
        ctx.repos.reminders.insert(&r2).await.expect("To insert reminder");

        ctx.repos
            .reminders
            .delete_by_customer(&customer.id)
            .await
            .expect("To delete reminders");
        assert!(ctx.repos.reminders.find(&r1.id).await.is_none());
        assert!(ctx.repos.reminders.find(&r2.id).await.is_some());

        ctx.repos
            .reminders
            .transition(&r2.id, ReminderStatus::Pending, ReminderStatus::Sending, 5)
            .await
            .expect("To transition reminder");
        assert!(ctx
            .repos
            .reminders
            .delete_unless_status(&r2.id, ReminderStatus::Sending)
            .await
            .is_none());
        assert!(ctx.repos.reminders.find(&r2.id).await.is_some());

        ctx.repos
            .reminders
            .transition(&r2.id, ReminderStatus::Sending, ReminderStatus::Sent, 6)
            .await
            .expect("To transition reminder");
        assert!(ctx
            .repos
            .reminders
            .delete_unless_status(&r2.id, ReminderStatus::Sending)
            .await
            .is_some());
        assert!(ctx.repos.reminders.find(&r2.id).await.is_none());
    }
}
