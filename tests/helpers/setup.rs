use greentick_api::Application;
use greentick_infra::{Config, GreentickContext};
use greentick_sdk::{GreentickSDK, ID};

use super::utils::create_token;

pub struct TestApp {
    pub config: Config,
    pub address: String,
}

impl TestApp {
    /// SDK acting on behalf of a new user
    pub fn new_user(&self) -> (ID, GreentickSDK) {
        let user_id = ID::new();
        let sdk = GreentickSDK::new(
            self.address.clone(),
            create_token(&self.config.jwt_secret, user_id, None),
        );
        (user_id, sdk)
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, GreentickSDK) {
    let mut ctx = GreentickContext::create_inmemory().await;
    ctx.config.port = 0; // Random port

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = GreentickSDK::new(address.clone(), "");
    let app = TestApp { config, address };
    (app, sdk)
}
