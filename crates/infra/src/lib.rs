mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IReminderRepo, InMemoryReminderRepo, MongoReminderRepo, ReminderFilters, Repos};
pub use services::*;
pub use system::{FakeSys, ISys, RealSys};

use std::sync::Arc;
use tracing::info;

/// Everything the use cases need: the reminder store, the notification
/// dispatch collaborator, config and a clock. Wired explicitly here, no
/// hidden global state.
#[derive(Clone)]
pub struct PetsyncContext {
    pub repos: Repos,
    pub notifier: Arc<dyn INotificationSender>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    // (connection_string, db_name)
    pub mongodb: (String, String),
}

impl PetsyncContext {
    /// Context backed entirely by in-process stores. Used by tests and as
    /// the fallback when no database is configured.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            notifier: Arc::new(StubNotificationSender::new()),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }

    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_mongodb(&params.mongodb.0, &params.mongodb.1)
            .await
            .expect("Mongodb credentials must be set and valid");
        let config = Config::new();
        let notifier = Arc::new(PushGatewaySender::new(
            config.push_gateway_url.clone(),
            config.push_gateway_key.clone(),
        ));
        Self {
            repos,
            notifier,
            config,
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> PetsyncContext {
    const MONGODB_CONNECTION_STRING: &str = "MONGODB_CONNECTION_STRING";
    const MONGODB_NAME: &str = "MONGODB_NAME";

    let connection_string = std::env::var(MONGODB_CONNECTION_STRING);
    let db_name = std::env::var(MONGODB_NAME);

    match (connection_string, db_name) {
        (Ok(connection_string), Ok(db_name)) => {
            info!(
                "{} and {} env vars were provided. Going to use mongodb.",
                MONGODB_CONNECTION_STRING, MONGODB_NAME
            );
            PetsyncContext::create(ContextParams {
                mongodb: (connection_string, db_name),
            })
            .await
        }
        _ => {
            info!(
                "{} and {} env vars were not provided. Going to use inmemory infra.",
                MONGODB_CONNECTION_STRING, MONGODB_NAME
            );
            let mut ctx = PetsyncContext::create_inmemory();
            ctx.notifier = Arc::new(PushGatewaySender::new(
                ctx.config.push_gateway_url.clone(),
                ctx.config.push_gateway_key.clone(),
            ));
            ctx
        }
    }
}
