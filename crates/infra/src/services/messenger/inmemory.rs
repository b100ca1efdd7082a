use super::{Delivery, IMessenger};
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub to: String,
    pub body: String,
}

/// Records messages instead of sending them. Used when no Twilio
/// credentials are configured and in tests.
pub struct InMemoryMessenger {
    sent: Mutex<Vec<SentMessage>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            failure: Mutex::new(None),
        }
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Every following send fails with `reason` until `recover` is called
    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }
}

impl Default for InMemoryMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMessenger for InMemoryMessenger {
    async fn send(&self, to: &str, body: &str) -> anyhow::Result<Delivery> {
        // Behave like a network call so concurrent dispatches interleave
        tokio::task::yield_now().await;

        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(anyhow::anyhow!(reason));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMessage {
            to: to.to_string(),
            body: body.to_string(),
        });
        let delivery_id = format!("SM{:032}", sent.len());
        info!("Recorded message to {} with id {}", to, delivery_id);

        Ok(Delivery {
            delivery_id,
            delivery_status: "queued".into(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn records_and_fails_on_demand() {
        let messenger = InMemoryMessenger::new();
        let delivery = messenger.send("+919876543210", "Hi").await.unwrap();
        assert_eq!(delivery.delivery_status, "queued");
        assert_eq!(
            messenger.sent_messages(),
            vec![SentMessage {
                to: "+919876543210".into(),
                body: "Hi".into()
            }]
        );

        messenger.fail_with("Invalid number");
        let err = messenger.send("+1", "Hi").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid number");
        assert_eq!(messenger.sent_messages().len(), 1);

        messenger.recover();
        assert!(messenger.send("+919876543210", "Hi again").await.is_ok());
        assert_eq!(messenger.sent_messages().len(), 2);
    }
}
