use crate::error::PetsyncError;
use crate::shared::usecase::UseCase;
use anyhow::Context;
use petsync_reminders_domain::{compute_next_run, Cadence, Reminder, ReminderStatus};
use petsync_reminders_infra::{NotificationPayload, PetsyncContext};
use std::time::Duration;
use tracing::{error, warn};

/// Body used when the reminder has no message of its own.
const DEFAULT_BODY: &str = "You have a reminder in PetSync.";
/// A slow gateway must not stall the rest of the batch indefinitely.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One poller tick: fetch the reminders that are due, dispatch a
/// notification for each and advance or complete its schedule.
#[derive(Debug)]
pub struct ProcessDueRemindersUseCase {
    pub batch_size: i64,
}

#[derive(Debug, Default, PartialEq)]
pub struct ProcessedBatch {
    pub dispatched: usize,
    pub rescheduled: usize,
    pub completed: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    Storage,
}

impl From<UseCaseError> for PetsyncError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for ProcessDueRemindersUseCase {
    type Response = ProcessedBatch;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessDueReminders";

    async fn execute(&mut self, ctx: &PetsyncContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .repos
            .reminders
            .find_due(now, self.batch_size)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        let mut batch = ProcessedBatch::default();
        for mut reminder in due {
            // One broken reminder must not starve the rest of the batch
            match process_reminder(&mut reminder, ctx).await {
                Ok(completed) => {
                    batch.dispatched += 1;
                    if completed {
                        batch.completed += 1;
                    } else {
                        batch.rescheduled += 1;
                    }
                }
                Err(e) => {
                    error!("Error while processing reminder {}: {:?}", reminder.id, e);
                    batch.failed += 1;
                }
            }
        }

        Ok(batch)
    }
}

/// Dispatches one due reminder and persists its advanced schedule.
/// Returns whether the reminder completed (one-shot) or was rescheduled.
async fn process_reminder(reminder: &mut Reminder, ctx: &PetsyncContext) -> anyhow::Result<bool> {
    let payload = build_payload(reminder);

    match tokio::time::timeout(
        DISPATCH_TIMEOUT,
        ctx.notifier.send(&payload, &reminder.owner_id),
    )
    .await
    {
        Ok(outcome) => {
            if !outcome.delivered {
                warn!(
                    "Notification for reminder {} was not delivered to user {}",
                    reminder.id, reminder.owner_id
                );
            }
        }
        Err(_) => {
            warn!(
                "Notification dispatch for reminder {} timed out after {:?}",
                reminder.id, DISPATCH_TIMEOUT
            );
        }
    }

    // Dispatch is best-effort. The schedule advances regardless, so that a
    // flaky gateway cannot make the poller hammer the same reminder forever.
    let completed = match reminder.repeat {
        Cadence::None => {
            reminder.status = ReminderStatus::Done;
            reminder.next_run_at = None;
            true
        }
        _ => {
            reminder.next_run_at = compute_next_run(
                reminder.target_at,
                reminder.repeat,
                reminder.lead_minutes,
                ctx.sys.get_timestamp_millis(),
            );
            false
        }
    };

    ctx.repos
        .reminders
        .save(reminder)
        .await
        .with_context(|| format!("Unable to save reminder {}", reminder.id))?;

    Ok(completed)
}

fn build_payload(reminder: &Reminder) -> NotificationPayload {
    let mut data = reminder.metadata.clone();
    data.insert("type".into(), "reminder".into());
    data.insert("reminderId".into(), reminder.id.as_string());
    data.insert(
        "petId".into(),
        reminder
            .pet_id
            .as_ref()
            .map(|id| id.as_string())
            .unwrap_or_default(),
    );

    NotificationPayload {
        title: reminder.title.clone(),
        body: reminder
            .message
            .clone()
            .unwrap_or_else(|| DEFAULT_BODY.into()),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::{DateTime, Utc};
    use petsync_reminders_domain::ID;
    use petsync_reminders_infra::{FakeSys, StubNotificationSender};
    use std::sync::Arc;

    fn millis(datetime: &str) -> i64 {
        datetime
            .parse::<DateTime<Utc>>()
            .unwrap()
            .timestamp_millis()
    }

    struct TestContext {
        ctx: PetsyncContext,
        sys: Arc<FakeSys>,
        sender: Arc<StubNotificationSender>,
    }

    fn setup(now: i64) -> TestContext {
        let mut ctx = PetsyncContext::create_inmemory();
        let sys = Arc::new(FakeSys::new(now));
        let sender = Arc::new(StubNotificationSender::new());
        ctx.sys = sys.clone();
        ctx.notifier = sender.clone();
        TestContext { ctx, sys, sender }
    }

    fn usecase() -> ProcessDueRemindersUseCase {
        ProcessDueRemindersUseCase { batch_size: 200 }
    }

    #[tokio::test]
    async fn a_one_shot_reminder_fires_once_and_completes() {
        let created = millis("2025-11-01T00:00:00Z");
        let TestContext { ctx, sys, sender } = setup(created);
        let owner_id = ID::new();

        let mut reminder = Reminder::new(owner_id.clone(), "Vaccine".into(), created);
        reminder.target_at = Some(millis("2025-11-05T12:00:00Z"));
        reminder.lead_minutes = 1440;
        reminder.next_run_at = compute_next_run(
            reminder.target_at,
            reminder.repeat,
            reminder.lead_minutes,
            created,
        );
        assert_eq!(reminder.next_run_at, Some(millis("2025-11-04T12:00:00Z")));
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        // One second before the fire instant nothing happens
        sys.set(millis("2025-11-04T11:59:59Z"));
        let batch = execute(usecase(), &ctx).await.unwrap();
        assert_eq!(batch, ProcessedBatch::default());

        sys.set(millis("2025-11-04T12:00:01Z"));
        let batch = execute(usecase(), &ctx).await.unwrap();
        assert_eq!(batch.dispatched, 1);
        assert_eq!(batch.completed, 1);
        assert_eq!(batch.failed, 0);

        let sent = sender.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].owner_id, owner_id);
        assert_eq!(sent[0].payload.title, "Vaccine");
        assert_eq!(sent[0].payload.body, DEFAULT_BODY);
        assert_eq!(
            sent[0].payload.data.get("reminderId"),
            Some(&reminder.id.as_string())
        );
        assert_eq!(sent[0].payload.data.get("type"), Some(&"reminder".into()));
        drop(sent);

        let stored = ctx
            .repos
            .reminders
            .find_by_owner(&owner_id, &reminder.id)
            .await
            .unwrap();
        assert_eq!(stored.status, ReminderStatus::Done);
        assert_eq!(stored.next_run_at, None);

        // A second tick is a no-op
        let batch = execute(usecase(), &ctx).await.unwrap();
        assert_eq!(batch, ProcessedBatch::default());
        assert_eq!(sender.sent_count(), 1);
    }

    #[tokio::test]
    async fn a_recurring_reminder_advances_past_the_tick_instant() {
        let created = millis("2025-06-01T08:00:00Z");
        let TestContext { ctx, sys, sender } = setup(created);
        let owner_id = ID::new();

        let mut reminder = Reminder::new(owner_id.clone(), "Feed".into(), created);
        reminder.repeat = Cadence::Daily;
        reminder.next_run_at = compute_next_run(None, Cadence::Daily, 0, created);
        assert_eq!(reminder.next_run_at, Some(millis("2025-06-02T08:00:00Z")));
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        sys.set(millis("2025-06-02T08:00:00Z"));
        let batch = execute(usecase(), &ctx).await.unwrap();
        assert_eq!(batch.dispatched, 1);
        assert_eq!(batch.rescheduled, 1);
        assert_eq!(sender.sent_count(), 1);

        let stored = ctx
            .repos
            .reminders
            .find_by_owner(&owner_id, &reminder.id)
            .await
            .unwrap();
        assert_eq!(stored.status, ReminderStatus::Active);
        // Strictly in the future relative to the tick
        assert_eq!(stored.next_run_at, Some(millis("2025-06-03T08:00:00Z")));
    }

    #[tokio::test]
    async fn a_recurring_reminder_skips_missed_cycles_after_downtime() {
        let created = millis("2025-06-01T08:00:00Z");
        let TestContext { ctx, sys, sender } = setup(created);
        let owner_id = ID::new();

        let mut reminder = Reminder::new(owner_id.clone(), "Feed".into(), created);
        reminder.repeat = Cadence::Daily;
        reminder.next_run_at = Some(millis("2025-06-02T08:00:00Z"));
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        // The poller was down for four days. One dispatch, not four.
        sys.set(millis("2025-06-06T10:00:00Z"));
        let batch = execute(usecase(), &ctx).await.unwrap();
        assert_eq!(batch.dispatched, 1);
        assert_eq!(sender.sent_count(), 1);

        let stored = ctx
            .repos
            .reminders
            .find_by_owner(&owner_id, &reminder.id)
            .await
            .unwrap();
        assert_eq!(stored.next_run_at, Some(millis("2025-06-07T08:00:00Z")));
    }

    #[tokio::test]
    async fn a_failed_delivery_still_advances_the_schedule() {
        let created = millis("2025-06-01T08:00:00Z");
        let TestContext { ctx, sys, sender } = setup(created);
        let owner_id = ID::new();

        let mut reminder = Reminder::new(owner_id.clone(), "Feed".into(), created);
        reminder.repeat = Cadence::Daily;
        reminder.next_run_at = Some(millis("2025-06-02T08:00:00Z"));
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        sender.fail_deliveries();
        sys.set(millis("2025-06-02T08:00:00Z"));
        let batch = execute(usecase(), &ctx).await.unwrap();
        assert_eq!(batch.dispatched, 1);
        assert_eq!(batch.failed, 0);

        let stored = ctx
            .repos
            .reminders
            .find_by_owner(&owner_id, &reminder.id)
            .await
            .unwrap();
        assert_eq!(stored.next_run_at, Some(millis("2025-06-03T08:00:00Z")));
    }

    #[tokio::test]
    async fn paused_reminders_are_never_dispatched() {
        let TestContext { ctx, sys, sender } = setup(0);

        let mut reminder = Reminder::new(ID::new(), "Walk".into(), 0);
        reminder.status = ReminderStatus::Paused;
        reminder.next_run_at = Some(1000);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        sys.set(5000);
        let batch = execute(usecase(), &ctx).await.unwrap();
        assert_eq!(batch, ProcessedBatch::default());
        assert_eq!(sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn the_batch_size_bounds_one_tick() {
        let TestContext { ctx, sys, sender } = setup(0);
        let owner_id = ID::new();

        for i in 0..5 {
            let mut reminder = Reminder::new(owner_id.clone(), format!("r{}", i), 0);
            reminder.next_run_at = Some(1000 + i);
            ctx.repos.reminders.insert(&reminder).await.unwrap();
        }

        sys.set(10_000);
        let batch = execute(ProcessDueRemindersUseCase { batch_size: 3 }, &ctx)
            .await
            .unwrap();
        assert_eq!(batch.dispatched, 3);
        assert_eq!(sender.sent_count(), 3);

        // The leftovers are picked up by the next tick
        let batch = execute(ProcessDueRemindersUseCase { batch_size: 3 }, &ctx)
            .await
            .unwrap();
        assert_eq!(batch.dispatched, 2);
        assert_eq!(sender.sent_count(), 5);
    }

    #[tokio::test]
    async fn a_custom_message_becomes_the_notification_body() {
        let TestContext { ctx, sys, sender } = setup(0);
        let pet_id = ID::new();

        let mut reminder = Reminder::new(ID::new(), "Medication".into(), 0);
        reminder.message = Some("Half a pill with food".into());
        reminder.pet_id = Some(pet_id.clone());
        reminder.next_run_at = Some(1000);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        sys.set(1000);
        execute(usecase(), &ctx).await.unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent[0].payload.body, "Half a pill with food");
        assert_eq!(sent[0].payload.data.get("petId"), Some(&pet_id.as_string()));
    }
}
