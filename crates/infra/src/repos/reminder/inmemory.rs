use super::{IReminderRepo, ReminderFilters};
use petsync_reminders_domain::{Reminder, ReminderStatus, ID};
use std::cmp::Ordering;
use std::sync::Mutex;

/// In-memory reminder store, used in tests and when no database is
/// configured.
pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(reminder: &Reminder, owner_id: &ID, filters: &ReminderFilters) -> bool {
    if reminder.owner_id != *owner_id {
        return false;
    }
    if let Some(pet_id) = &filters.pet_id {
        if reminder.pet_id.as_ref() != Some(pet_id) {
            return false;
        }
    }
    if let Some(status) = filters.status {
        if reminder.status != status {
            return false;
        }
    }
    true
}

// next_run_at ascending with unscheduled reminders first (a missing
// value sorts before every number in the document store), created_at
// descending as the tie breaker
fn list_order(a: &Reminder, b: &Reminder) -> Ordering {
    match (a.next_run_at, b.next_run_at) {
        (Some(x), Some(y)) => x.cmp(&y).then(b.created_at.cmp(&a.created_at)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.reminders.lock().unwrap().push(reminder.clone());
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        if let Some(existing) = reminders.iter_mut().find(|r| r.id == reminder.id) {
            *existing = reminder.clone();
        }
        Ok(())
    }

    async fn find_by_owner(&self, owner_id: &ID, reminder_id: &ID) -> Option<Reminder> {
        self.reminders
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == *reminder_id && r.owner_id == *owner_id)
            .cloned()
    }

    async fn list_by_owner(
        &self,
        owner_id: &ID,
        filters: &ReminderFilters,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Reminder>> {
        let mut matching: Vec<Reminder> = self
            .reminders
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches(r, owner_id, filters))
            .cloned()
            .collect();
        matching.sort_by(list_order);
        Ok(matching
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_by_owner(
        &self,
        owner_id: &ID,
        filters: &ReminderFilters,
    ) -> anyhow::Result<i64> {
        let count = self
            .reminders
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches(r, owner_id, filters))
            .count();
        Ok(count as i64)
    }

    async fn find_due(&self, before_inc: i64, limit: i64) -> anyhow::Result<Vec<Reminder>> {
        let mut due: Vec<Reminder> = self
            .reminders
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.status == ReminderStatus::Active
                    && r.next_run_at.map_or(false, |at| at <= before_inc)
            })
            .cloned()
            .collect();
        due.sort_by_key(|r| r.next_run_at);
        due.truncate(limit as usize);
        Ok(due)
    }

    async fn delete_by_owner(&self, owner_id: &ID, reminder_id: &ID) -> Option<Reminder> {
        let mut reminders = self.reminders.lock().unwrap();
        let index = reminders
            .iter()
            .position(|r| r.id == *reminder_id && r.owner_id == *owner_id)?;
        Some(reminders.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petsync_reminders_domain::Cadence;

    fn reminder_at(owner_id: &ID, title: &str, next_run_at: Option<i64>, created_at: i64) -> Reminder {
        let mut reminder = Reminder::new(owner_id.clone(), title.into(), created_at);
        reminder.next_run_at = next_run_at;
        reminder
    }

    #[tokio::test]
    async fn it_lists_soonest_due_first_with_newest_tie_break() {
        let repo = InMemoryReminderRepo::new();
        let owner_id = ID::new();

        repo.insert(&reminder_at(&owner_id, "later", Some(300), 1))
            .await
            .unwrap();
        repo.insert(&reminder_at(&owner_id, "soon-old", Some(100), 1))
            .await
            .unwrap();
        repo.insert(&reminder_at(&owner_id, "soon-new", Some(100), 2))
            .await
            .unwrap();
        repo.insert(&reminder_at(&owner_id, "unscheduled-old", None, 3))
            .await
            .unwrap();
        repo.insert(&reminder_at(&owner_id, "unscheduled-new", None, 4))
            .await
            .unwrap();

        // An absent next_run_at sorts before every concrete instant, the
        // same order the document store's ascending sort produces
        let listed = repo
            .list_by_owner(&owner_id, &ReminderFilters::default(), 0, 10)
            .await
            .unwrap();
        let titles: Vec<&str> = listed.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "unscheduled-new",
                "unscheduled-old",
                "soon-new",
                "soon-old",
                "later"
            ]
        );
    }

    #[tokio::test]
    async fn it_never_leaks_other_owners_records() {
        let repo = InMemoryReminderRepo::new();
        let owner_a = ID::new();
        let owner_b = ID::new();

        let reminder = reminder_at(&owner_b, "b's", Some(100), 1);
        repo.insert(&reminder).await.unwrap();

        assert!(repo.find_by_owner(&owner_a, &reminder.id).await.is_none());
        assert!(repo.delete_by_owner(&owner_a, &reminder.id).await.is_none());
        assert_eq!(
            repo.count_by_owner(&owner_a, &ReminderFilters::default())
                .await
                .unwrap(),
            0
        );
        // Still present for its real owner
        assert!(repo.find_by_owner(&owner_b, &reminder.id).await.is_some());
    }

    #[tokio::test]
    async fn find_due_skips_paused_and_unscheduled_reminders() {
        let repo = InMemoryReminderRepo::new();
        let owner_id = ID::new();

        let mut due = reminder_at(&owner_id, "due", Some(50), 1);
        due.repeat = Cadence::Daily;
        repo.insert(&due).await.unwrap();

        let mut paused = reminder_at(&owner_id, "paused", Some(10), 1);
        paused.status = ReminderStatus::Paused;
        repo.insert(&paused).await.unwrap();

        repo.insert(&reminder_at(&owner_id, "future", Some(500), 1))
            .await
            .unwrap();
        repo.insert(&reminder_at(&owner_id, "unscheduled", None, 1))
            .await
            .unwrap();

        let found = repo.find_due(100, 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "due");
    }

    #[tokio::test]
    async fn find_due_is_bounded_by_the_batch_limit() {
        let repo = InMemoryReminderRepo::new();
        let owner_id = ID::new();

        for i in 0..5 {
            repo.insert(&reminder_at(&owner_id, "due", Some(i), 1))
                .await
                .unwrap();
        }

        let found = repo.find_due(100, 3).await.unwrap();
        assert_eq!(found.len(), 3);
        // Most overdue first
        assert_eq!(found[0].next_run_at, Some(0));
    }
}
