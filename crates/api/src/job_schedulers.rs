use crate::{reminder::SendPendingRemindersUseCase, shared::usecase::execute};
use actix_web::rt::time::{interval, sleep_until, Instant};
use greentick_infra::GreentickContext;
use std::time::Duration;
use tracing::{error, info};

/// Seconds until the next minute boundary after `now_ts` millis, in `1..=60`
pub fn get_start_delay(now_ts: i64) -> u64 {
    (60 - (now_ts / 1000).rem_euclid(60)) as u64
}

/// Dispatches the due reminders of every user, starting at the next
/// minute boundary
pub fn start_send_reminders_job(ctx: GreentickContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run);

        sleep_until(start).await;
        let mut send_interval = interval(Duration::from_secs(
            ctx.config.send_reminders_interval_secs,
        ));
        loop {
            send_interval.tick().await;
            send_reminders(&ctx).await;
        }
    });
}

async fn send_reminders(ctx: &GreentickContext) {
    let usecase = SendPendingRemindersUseCase { user_id: None };
    match execute(usecase, ctx).await {
        Ok(res) => {
            if !res.failed_reminders.is_empty() {
                error!(
                    "Failed to deliver {} reminders: {:?}",
                    res.failed_reminders.len(),
                    res.failed_reminders
                );
            }
            if !res.sent_reminders.is_empty() {
                info!("Sent {} reminders", res.sent_reminders.len());
            }
        }
        Err(e) => error!("Send reminders job failed: {:?}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(0), 60);
        assert_eq!(get_start_delay(50 * 1000), 10);
        assert_eq!(get_start_delay(50 * 1000 + 999), 10);
        assert_eq!(get_start_delay(59 * 1000), 1);
        assert_eq!(get_start_delay(60 * 1000), 60);
        assert_eq!(get_start_delay(1_700_000_030_000), 10);
    }
}
