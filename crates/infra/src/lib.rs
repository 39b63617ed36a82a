mod config;
mod repos;
mod services;
mod system;
mod timers;

pub use config::Config;
pub use repos::{IItemRepo, IReminderLogRepo, IReminderRepo, IUserRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys};
pub use timers::{TimerKey, TimerRegistry};
use tracing::{error, info};

#[derive(Clone)]
pub struct MedContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub services: Services,
    pub timers: Arc<TimerRegistry>,
}

struct ContextParams {
    pub postgres_connection_string: Option<String>,
}

impl MedContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let config = Config::new();
        let repos = match params.postgres_connection_string {
            Some(connection_string) => Repos::create_postgres(&connection_string).await?,
            None => {
                info!("No DATABASE_URL given, reminders will only be kept in memory");
                Repos::create_inmemory()
            }
        };
        Ok(Self {
            repos,
            services: Services::create(&config),
            config,
            sys: Arc::new(RealSys {}),
            timers: Arc::new(TimerRegistry::new()),
        })
    }

    /// In memory store and recording collaborators, used by tests
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            services: Services::create_inmemory(),
            timers: Arc::new(TimerRegistry::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<MedContext> {
    let ctx = MedContext::create(ContextParams {
        postgres_connection_string: std::env::var("DATABASE_URL").ok(),
    })
    .await;
    if let Err(e) = &ctx {
        error!("Unable to setup the context: {:?}", e);
    }
    ctx
}
