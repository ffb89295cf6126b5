mod inmemory;
mod mongo;

pub use inmemory::InMemoryReminderRepo;
pub use mongo::MongoReminderRepo;

use petsync_reminders_domain::{Reminder, ReminderStatus, ID};

/// Optional narrowing for owner-scoped listing.
#[derive(Debug, Clone, Default)]
pub struct ReminderFilters {
    pub pet_id: Option<ID>,
    pub status: Option<ReminderStatus>,
}

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// Owner-scoped lookup. The owner filter is part of the query itself,
    /// so a foreign id behaves exactly like a missing one.
    async fn find_by_owner(&self, owner_id: &ID, reminder_id: &ID) -> Option<Reminder>;
    /// A page of the owner's reminders sorted by
    /// (next_run_at ascending with unscheduled records first,
    /// created_at descending).
    async fn list_by_owner(
        &self,
        owner_id: &ID,
        filters: &ReminderFilters,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Reminder>>;
    async fn count_by_owner(&self, owner_id: &ID, filters: &ReminderFilters)
        -> anyhow::Result<i64>;
    /// Active reminders whose next_run_at is at or before `before_inc`,
    /// most overdue first, bounded by `limit`.
    async fn find_due(&self, before_inc: i64, limit: i64) -> anyhow::Result<Vec<Reminder>>;
    async fn delete_by_owner(&self, owner_id: &ID, reminder_id: &ID) -> Option<Reminder>;
}
