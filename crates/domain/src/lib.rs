mod customer;
mod payment;
pub mod recurrence;
mod reminder;
mod shared;
pub mod template;

pub use customer::Customer;
pub use payment::{InvalidPaymentStatusError, Payment, PaymentStatus, DEFAULT_CURRENCY};
pub use recurrence::{Frequency, InvalidFrequencyError};
pub use reminder::{
    InvalidReminderError, InvalidReminderStatusError, Reminder, ReminderStatus, RetryPolicy,
    MAX_TIMESTAMP_MILLIS,
};
pub use shared::entity::{Entity, ID};
pub use template::{Template, TemplateError, TemplateVariables};
