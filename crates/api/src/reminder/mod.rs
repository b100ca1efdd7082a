mod create_reminder;
mod delete_reminder;
mod dispatch;
mod get_reminder;
mod get_reminders;
mod send_pending_reminders;
mod send_reminder;
mod update_reminder;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_reminder::get_reminder_controller;
use get_reminders::get_reminders_controller;
use send_pending_reminders::send_pending_reminders_controller;
use send_reminder::send_reminder_controller;
use update_reminder::update_reminder_controller;

pub use create_reminder::CreateReminderUseCase;
pub use send_pending_reminders::SendPendingRemindersUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route(
        "/reminders/send-pending",
        web::post().to(send_pending_reminders_controller),
    );

    cfg.route(
        "/reminders/{reminder_id}",
        web::get().to(get_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/send",
        web::post().to(send_reminder_controller),
    );
}
