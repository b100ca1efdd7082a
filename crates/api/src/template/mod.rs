mod create_template;
mod get_templates;
mod preview_template;
mod update_template;

use actix_web::web;
use create_template::create_template_controller;
use get_templates::get_templates_controller;
use preview_template::preview_template_controller;
use update_template::update_template_controller;

// Registered before the reminder routes so that `/reminders/templates`
// is not matched as a reminder id
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminders/templates",
        web::get().to(get_templates_controller),
    );
    cfg.route(
        "/reminders/templates",
        web::post().to(create_template_controller),
    );
    cfg.route(
        "/reminders/templates/{template_id}",
        web::put().to(update_template_controller),
    );
    cfg.route(
        "/reminders/preview-template",
        web::post().to(preview_template_controller),
    );
}
