mod error;
mod item;
mod job_schedulers;
mod reminder;
mod reminder_log;
mod scheduler;
mod shared;
mod status;
mod user;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use job_schedulers::{start_low_stock_watch_job, start_rearm_reminders_job};
use medremind_infra::MedContext;
use std::net::TcpListener;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::MedError;
pub use item::{restock_item::RestockItemUseCase, sweep_low_stock::SweepLowStockUseCase};
pub use reminder::{
    create_reminder::CreateReminderUseCase, set_reminder_active::SetReminderActiveUseCase,
    update_reminder_schedule::UpdateReminderScheduleUseCase,
};
pub use scheduler::Scheduler;
pub use shared::usecase::{execute, UseCase};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    item::configure_routes(cfg);
    reminder::configure_routes(cfg);
    reminder_log::configure_routes(cfg);
    status::configure_routes(cfg);
    user::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: MedContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: MedContext) {
        start_rearm_reminders_job(context.clone());
        start_low_stock_watch_job(context);
    }

    async fn configure_server(context: MedContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        info!("Listening on port: {}", port);

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
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
