mod create_payment;
mod get_payment;
mod get_payments;
mod payment_webhook;

use actix_web::web;
use create_payment::create_payment_controller;
use get_payment::get_payment_controller;
use get_payments::get_payments_controller;
use payment_webhook::payment_webhook_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/payments", web::post().to(create_payment_controller));
    cfg.route("/payments", web::get().to(get_payments_controller));
    cfg.route(
        "/payments/webhook",
        web::post().to(payment_webhook_controller),
    );
    cfg.route(
        "/payments/{payment_id}",
        web::get().to(get_payment_controller),
    );
}
