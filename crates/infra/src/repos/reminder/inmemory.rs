use super::IReminderRepo;
use crate::repos::shared::{inmemory_repo::*, query_structs::ReminderQuery};
use greentick_domain::{Reminder, ReminderStatus, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn save_if_status(
        &self,
        reminder: &Reminder,
        expected: ReminderStatus,
    ) -> anyhow::Result<bool> {
        let updated = update_one(
            &self.reminders,
            |r| r.id == reminder.id && r.status == expected,
            |r| *r = reminder.clone(),
        );
        Ok(updated.is_some())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_query(&self, query: ReminderQuery) -> Vec<Reminder> {
        let mut reminders = find_by(&self.reminders, |r| query.matches(r));
        reminders.sort_by_key(|r| r.send_ts);
        paginate(reminders, query.skip, query.limit)
    }

    async fn find_due(&self, now: i64, limit: usize) -> Vec<Reminder> {
        let mut reminders = find_by(&self.reminders, |r| r.is_due(now));
        reminders.sort_by_key(|r| r.send_ts);
        paginate(reminders, 0, limit)
    }

    async fn delete_unless_status(
        &self,
        reminder_id: &ID,
        status: ReminderStatus,
    ) -> Option<Reminder> {
        find_and_delete_by(&self.reminders, |r| {
            r.id == *reminder_id && r.status != status
        })
        .pop()
    }

    async fn delete_by_customer(&self, customer_id: &ID) -> anyhow::Result<()> {
        find_and_delete_by(&self.reminders, |r| r.customer_id == *customer_id);
        Ok(())
    }

    async fn transition(
        &self,
        reminder_id: &ID,
        from: ReminderStatus,
        to: ReminderStatus,
        now: i64,
    ) -> anyhow::Result<Option<Reminder>> {
        Ok(update_one(
            &self.reminders,
            |r| r.id == *reminder_id && r.status == from,
            |r| {
                r.status = to;
                r.updated = now;
            },
        ))
    }
}
