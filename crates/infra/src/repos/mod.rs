mod reminder;

pub use reminder::{IReminderRepo, InMemoryReminderRepo, MongoReminderRepo, ReminderFilters};

use mongodb::bson::Document;
use mongodb::{options::ClientOptions, Client};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub async fn create_mongodb(
        connection_string: &str,
        db_name: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // This is needed to make sure that db is ready before the schedulers start
        info!("DB CHECKING CONNECTION ...");
        db.collection::<Document>("server-start")
            .insert_one(
                mongodb::bson::doc! {
                "server-start": 1
                },
                None,
            )
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            reminders: Arc::new(MongoReminderRepo::new(&db)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
        }
    }
}
