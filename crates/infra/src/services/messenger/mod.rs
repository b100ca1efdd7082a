mod inmemory;
mod twilio;

pub use inmemory::{InMemoryMessenger, SentMessage};
pub use twilio::TwilioMessenger;

/// Receipt of a message accepted by the messaging provider
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub delivery_id: String,
    pub delivery_status: String,
}

/// Outbound WhatsApp channel
#[async_trait::async_trait]
pub trait IMessenger: Send + Sync {
    /// Sends `body` to the phone number `to`. An `Err` means the provider
    /// did not accept the message.
    async fn send(&self, to: &str, body: &str) -> anyhow::Result<Delivery>;
}
