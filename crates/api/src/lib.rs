mod customer;
mod error;
mod job_schedulers;
mod payment;
mod reminder;
mod shared;
mod status;
mod template;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use greentick_infra::GreentickContext;
use job_schedulers::start_send_reminders_job;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub use error::GreentickError;
pub use shared::auth::{Claims, Permission, Policy};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    customer::configure_routes(cfg);
    payment::configure_routes(cfg);
    template::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: GreentickContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: GreentickContext) {
        start_send_reminders_job(context);
    }

    async fn configure_server(context: GreentickContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        let context = web::Data::new(context);

        let server = HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(context.clone())
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
