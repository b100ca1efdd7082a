use crate::shared::entity::{Entity, ID};

/// A person the business sends reminders and payment links to.
/// Every `Customer` belongs to exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: ID,
    /// Owner of this `Customer`
    pub user_id: ID,
    pub name: String,
    /// Phone number used as the WhatsApp destination
    pub phone: String,
    pub notes: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl Customer {
    pub fn new(user_id: ID, name: String, phone: String, notes: Option<String>, now: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            name,
            phone,
            notes,
            created: now,
            updated: now,
        }
    }

    /// Strips formatting characters so that `+91 98765-43210` and
    /// `+919876543210` are treated as the same number
    pub fn normalize_phone(phone: &str) -> String {
        phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect()
    }

    pub fn is_valid_phone(phone: &str) -> bool {
        let normalized = Self::normalize_phone(phone);
        let digits = normalized.trim_start_matches('+');
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) && digits.len() <= 15
    }
}

impl Entity<ID> for Customer {
    fn id(&self) -> ID {
        self.id
    }
}
