use greentick_domain::{Customer, Reminder, ReminderStatus, ID};
use greentick_infra::GreentickContext;
use thiserror::Error;
use tracing::{error, warn};

/// Outcome of a confirmed delivery
#[derive(Debug)]
pub struct Dispatched {
    pub reminder: Reminder,
    /// Next occurrence of the series, already stored as `Pending`
    pub next_reminder: Option<Reminder>,
    pub customer: Customer,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("The reminder with id: {0}, is not pending")]
    NotClaimed(ID),
    #[error("The customer with id: {0}, was not found")]
    CustomerNotFound(ID),
    #[error("Delivery failed: {error}")]
    Delivery {
        /// The reminder after the failure was recorded
        reminder: Reminder,
        error: String,
    },
    #[error("Storage error")]
    StorageError,
}

/// Claims the reminder and delivers it to the customer.
///
/// Only the caller that wins the `Pending -> Sending` transition talks to
/// the messenger, so a reminder is delivered at most once even when it is
/// dispatched concurrently.
pub async fn dispatch(reminder: &Reminder, ctx: &GreentickContext) -> Result<Dispatched, DispatchError> {
    let customer = ctx
        .repos
        .customers
        .find(&reminder.customer_id)
        .await
        .ok_or(DispatchError::CustomerNotFound(reminder.customer_id))?;

    let mut claimed = match ctx
        .repos
        .reminders
        .transition(
            &reminder.id,
            ReminderStatus::Pending,
            ReminderStatus::Sending,
            ctx.sys.get_timestamp_millis(),
        )
        .await
    {
        Ok(Some(claimed)) => claimed,
        Ok(None) => return Err(DispatchError::NotClaimed(reminder.id)),
        Err(e) => {
            error!("Unable to claim reminder {}: {:?}", reminder.id, e);
            return Err(DispatchError::StorageError);
        }
    };

    let delivery = ctx.messenger.send(&customer.phone, &claimed.message).await;
    let now = ctx.sys.get_timestamp_millis();
    match delivery {
        Ok(delivery) => {
            claimed.mark_sent(delivery.delivery_id, now);
            ctx.repos.reminders.save(&claimed).await.map_err(|e| {
                error!("Unable to store delivered reminder {}: {:?}", claimed.id, e);
                DispatchError::StorageError
            })?;

            let next_reminder = claimed.next_occurrence(now);
            if let Some(next) = &next_reminder {
                ctx.repos.reminders.insert(next).await.map_err(|e| {
                    error!("Unable to store next occurrence of {}: {:?}", claimed.id, e);
                    DispatchError::StorageError
                })?;
            }

            Ok(Dispatched {
                reminder: claimed,
                next_reminder,
                customer,
            })
        }
        Err(e) => {
            let error = e.to_string();
            warn!("Delivery of reminder {} failed: {}", claimed.id, error);
            claimed.mark_delivery_failed(error.clone(), &ctx.config.retry_policy, now);
            ctx.repos.reminders.save(&claimed).await.map_err(|e| {
                error!("Unable to store failed reminder {}: {:?}", claimed.id, e);
                DispatchError::StorageError
            })?;

            Err(DispatchError::Delivery {
                reminder: claimed,
                error,
            })
        }
    }
}
