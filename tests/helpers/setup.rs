use medremind_api::Application;
use medremind_infra::{InMemoryAdherenceHooks, InMemoryNotifier, MedContext};
use medremind_sdk::MedremindSDK;
use std::sync::Arc;

pub struct TestApp {
    /// Shares the store and timers with the running server
    pub ctx: MedContext,
    pub notifier: Arc<InMemoryNotifier>,
    pub hooks: Arc<InMemoryAdherenceHooks>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, MedremindSDK) {
    let mut ctx = MedContext::create_inmemory();
    ctx.config.port = 0; // Random port
    let notifier = Arc::new(InMemoryNotifier::new());
    let hooks = Arc::new(InMemoryAdherenceHooks::new());
    ctx.services.notifier = notifier.clone();
    ctx.services.hooks = hooks.clone();

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        ctx,
        notifier,
        hooks,
    };
    (app, MedremindSDK::new(address))
}
