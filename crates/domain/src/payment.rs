use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Created,
    Paid,
    Cancelled,
    Expired,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::Failed => "failed",
        }
    }

    pub fn is_final(&self) -> bool {
        *self != Self::Created
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid payment status: `{0}`")]
pub struct InvalidPaymentStatusError(pub String);

impl FromStr for PaymentStatus {
    type Err = InvalidPaymentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            "failed" => Ok(Self::Failed),
            _ => Err(InvalidPaymentStatusError(s.to_string())),
        }
    }
}

/// A payment link requested from the payment provider for a `Customer`
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: ID,
    pub user_id: ID,
    pub customer_id: ID,
    /// Amount in the smallest currency unit, e.g. paise for INR
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub status: PaymentStatus,
    /// Id of the payment link at the provider
    pub provider_link_id: String,
    /// Shareable url of the payment link
    pub short_url: String,
    /// Id of the provider payment, known once the link is paid
    pub provider_payment_id: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl Payment {
    pub fn new(
        user_id: ID,
        customer_id: ID,
        amount: i64,
        description: String,
        provider_link_id: String,
        short_url: String,
        now: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            customer_id,
            amount,
            currency: DEFAULT_CURRENCY.into(),
            description,
            status: PaymentStatus::Created,
            provider_link_id,
            short_url,
            provider_payment_id: None,
            created: now,
            updated: now,
        }
    }

    /// Applies a status reported by the provider. Only a `Created` payment
    /// can change status, so replayed webhooks are no-ops. Returns whether
    /// the payment changed.
    pub fn reconcile(
        &mut self,
        status: PaymentStatus,
        provider_payment_id: Option<String>,
        now: i64,
    ) -> bool {
        if self.status.is_final() || status == self.status {
            return false;
        }
        self.status = status;
        if provider_payment_id.is_some() {
            self.provider_payment_id = provider_payment_id;
        }
        self.updated = now;
        true
    }
}

impl Entity<ID> for Payment {
    fn id(&self) -> ID {
        self.id
    }
}
