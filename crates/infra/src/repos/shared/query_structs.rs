use greentick_domain::{ReminderStatus, ID};

pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Converts a skip or limit into a SQL `BIGINT`, saturating at `i64::MAX`
pub(crate) fn sql_bound(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Filters for listing the `Reminder`s of a single user.
/// Results are ordered by ascending send time.
#[derive(Debug, Clone)]
pub struct ReminderQuery {
    pub user_id: ID,
    pub status: Option<ReminderStatus>,
    pub customer_id: Option<ID>,
    /// Inclusive lower bound on `send_ts`
    pub start_ts: Option<i64>,
    /// Inclusive upper bound on `send_ts`
    pub end_ts: Option<i64>,
    pub skip: usize,
    pub limit: usize,
}

impl ReminderQuery {
    pub fn new(user_id: ID) -> Self {
        Self {
            user_id,
            status: None,
            customer_id: None,
            start_ts: None,
            end_ts: None,
            skip: 0,
            limit: DEFAULT_QUERY_LIMIT,
        }
    }

    /// Pending reminders of the user that are due at `now`
    pub fn due(user_id: ID, now: i64, limit: usize) -> Self {
        Self {
            status: Some(ReminderStatus::Pending),
            end_ts: Some(now),
            limit,
            ..Self::new(user_id)
        }
    }

    pub fn matches(&self, reminder: &greentick_domain::Reminder) -> bool {
        reminder.user_id == self.user_id
            && self.status.map_or(true, |s| reminder.status == s)
            && self.customer_id.map_or(true, |c| reminder.customer_id == c)
            && self.start_ts.map_or(true, |ts| reminder.send_ts >= ts)
            && self.end_ts.map_or(true, |ts| reminder.send_ts <= ts)
    }
}

/// Skip and limit for the owner scoped listings of customers and payments
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub user_id: ID,
    pub customer_id: Option<ID>,
    pub skip: usize,
    pub limit: usize,
}

impl PageQuery {
    pub fn new(user_id: ID) -> Self {
        Self {
            user_id,
            customer_id: None,
            skip: 0,
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}
