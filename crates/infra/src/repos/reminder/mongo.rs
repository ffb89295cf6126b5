use super::{IReminderRepo, ReminderFilters};
use futures::stream::StreamExt;
use mongodb::{
    bson::{doc, from_document, oid::ObjectId, to_document, Document},
    options::FindOptions,
    Collection, Database,
};
use petsync_reminders_domain::{Cadence, Metadata, Reminder, ReminderStatus, ID};
use serde::{Deserialize, Serialize};
use tracing::error;

pub struct MongoReminderRepo {
    collection: Collection<Document>,
}

impl MongoReminderRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("reminders"),
        }
    }

    async fn find_one(&self, filter: Document) -> Option<Reminder> {
        match self.collection.find_one(filter, None).await {
            Ok(Some(document)) => to_domain(document),
            Ok(None) => None,
            Err(err) => {
                error!("Reminder lookup failed: {:?}", err);
                None
            }
        }
    }

    async fn find_many(
        &self,
        filter: Document,
        options: FindOptions,
    ) -> anyhow::Result<Vec<Reminder>> {
        let mut cursor = self.collection.find(filter, options).await?;
        let mut reminders = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(document) => {
                    if let Some(reminder) = to_domain(document) {
                        reminders.push(reminder);
                    }
                }
                Err(err) => {
                    error!("Error consuming reminder cursor: {:?}", err);
                }
            }
        }
        Ok(reminders)
    }
}

fn owner_filter(owner_id: &ID, filters: &ReminderFilters) -> Document {
    let mut filter = doc! {
        "owner_id": *owner_id.inner_ref(),
    };
    if let Some(pet_id) = &filters.pet_id {
        filter.insert("pet_id", *pet_id.inner_ref());
    }
    if let Some(status) = &filters.status {
        filter.insert("status", status.as_str());
    }
    filter
}

fn to_domain(document: Document) -> Option<Reminder> {
    match from_document::<ReminderMongo>(document) {
        Ok(raw) => Some(raw.to_domain()),
        Err(err) => {
            // A malformed document must not take the whole batch down
            error!("Malformed reminder document: {:?}", err);
            None
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for MongoReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let document = to_document(&ReminderMongo::from_domain(reminder))?;
        self.collection.insert_one(document, None).await?;
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let raw = ReminderMongo::from_domain(reminder);
        let filter = doc! { "_id": raw._id };
        let document = to_document(&raw)?;
        self.collection.replace_one(filter, document, None).await?;
        Ok(())
    }

    async fn find_by_owner(&self, owner_id: &ID, reminder_id: &ID) -> Option<Reminder> {
        self.find_one(doc! {
            "_id": *reminder_id.inner_ref(),
            "owner_id": *owner_id.inner_ref(),
        })
        .await
    }

    async fn list_by_owner(
        &self,
        owner_id: &ID,
        filters: &ReminderFilters,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Reminder>> {
        let options = FindOptions::builder()
            .sort(doc! { "next_run_at": 1, "created_at": -1 })
            .skip(skip as u64)
            .limit(limit)
            .build();
        self.find_many(owner_filter(owner_id, filters), options)
            .await
    }

    async fn count_by_owner(
        &self,
        owner_id: &ID,
        filters: &ReminderFilters,
    ) -> anyhow::Result<i64> {
        let count = self
            .collection
            .count_documents(owner_filter(owner_id, filters), None)
            .await?;
        Ok(count as i64)
    }

    async fn find_due(&self, before_inc: i64, limit: i64) -> anyhow::Result<Vec<Reminder>> {
        let filter = doc! {
            "status": ReminderStatus::Active.as_str(),
            "next_run_at": { "$lte": before_inc },
        };
        let options = FindOptions::builder()
            .sort(doc! { "next_run_at": 1 })
            .limit(limit)
            .build();
        self.find_many(filter, options).await
    }

    async fn delete_by_owner(&self, owner_id: &ID, reminder_id: &ID) -> Option<Reminder> {
        let filter = doc! {
            "_id": *reminder_id.inner_ref(),
            "owner_id": *owner_id.inner_ref(),
        };
        match self.collection.find_one_and_delete(filter, None).await {
            Ok(Some(document)) => to_domain(document),
            Ok(None) => None,
            Err(err) => {
                error!("Reminder delete failed: {:?}", err);
                None
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ReminderMongo {
    _id: ObjectId,
    owner_id: ObjectId,
    pet_id: Option<ObjectId>,
    title: String,
    message: Option<String>,
    target_at: Option<i64>,
    repeat: Cadence,
    lead_minutes: i64,
    next_run_at: Option<i64>,
    status: ReminderStatus,
    metadata: Metadata,
    created_at: i64,
}

impl ReminderMongo {
    fn to_domain(self) -> Reminder {
        Reminder {
            id: ID::from(self._id),
            owner_id: ID::from(self.owner_id),
            pet_id: self.pet_id.map(ID::from),
            title: self.title,
            message: self.message,
            target_at: self.target_at,
            repeat: self.repeat,
            lead_minutes: self.lead_minutes,
            next_run_at: self.next_run_at,
            status: self.status,
            metadata: self.metadata,
            created_at: self.created_at,
        }
    }

    fn from_domain(reminder: &Reminder) -> Self {
        Self {
            _id: *reminder.id.inner_ref(),
            owner_id: *reminder.owner_id.inner_ref(),
            pet_id: reminder.pet_id.as_ref().map(|id| *id.inner_ref()),
            title: reminder.title.clone(),
            message: reminder.message.clone(),
            target_at: reminder.target_at,
            repeat: reminder.repeat,
            lead_minutes: reminder.lead_minutes,
            next_run_at: reminder.next_run_at,
            status: reminder.status,
            metadata: reminder.metadata.clone(),
            created_at: reminder.created_at,
        }
    }
}
