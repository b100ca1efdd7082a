mod base;
mod customer;
mod payment;
mod reminder;
mod status;
mod template;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use customer::CustomerClient;
pub use customer::{CreateCustomerInput, GetCustomersInput, UpdateCustomerInput};
pub use greentick_api_structs::dtos::*;
pub use greentick_domain::{Frequency, PaymentStatus, ReminderStatus, TemplateVariables, ID};
use payment::PaymentClient;
pub use payment::{CreatePaymentInput, GetPaymentsInput};
use reminder::ReminderClient;
pub use reminder::{CreateReminderInput, GetRemindersInput, UpdateReminderInput};
use status::StatusClient;
use std::sync::Arc;
use template::TemplateClient;
pub use template::{CreateTemplateInput, PreviewTemplateInput, UpdateTemplateInput};

// Domain
pub use greentick_api_structs::dtos::CustomerDTO as Customer;
pub use greentick_api_structs::dtos::PaymentDTO as Payment;
pub use greentick_api_structs::dtos::ReminderDTO as Reminder;
pub use greentick_api_structs::dtos::TemplateDTO as Template;

/// Greentick SDK
///
/// The SDK contains methods for interacting with the Greentick server API
/// on behalf of the user identified by the bearer token.
#[derive(Clone)]
pub struct GreentickSDK {
    pub customer: CustomerClient,
    pub payment: PaymentClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub template: TemplateClient,
}

impl GreentickSDK {
    pub fn new<T: Into<String>>(address: String, token: T) -> Self {
        let mut base = BaseClient::new(address);
        let token = token.into();
        if !token.is_empty() {
            base.set_token(token);
        }
        let base = Arc::new(base);
        let customer = CustomerClient::new(base.clone());
        let payment = PaymentClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let template = TemplateClient::new(base);

        Self {
            customer,
            payment,
            reminder,
            status,
            template,
        }
    }
}
