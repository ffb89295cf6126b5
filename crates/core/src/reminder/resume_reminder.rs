use crate::error::PetsyncError;
use crate::shared::usecase::UseCase;
use petsync_reminders_domain::{compute_next_run, Reminder, ReminderStatus, ID};
use petsync_reminders_infra::PetsyncContext;

/// Puts a paused or completed reminder back in rotation. A kept fire
/// instant is honored as is, otherwise a fresh one is derived.
#[derive(Debug)]
pub struct ResumeReminderUseCase {
    pub owner_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    Storage,
}

impl From<UseCaseError> for PetsyncError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for ResumeReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "ResumeReminder";

    async fn execute(&mut self, ctx: &PetsyncContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = ctx
            .repos
            .reminders
            .find_by_owner(&self.owner_id, &self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        reminder.status = ReminderStatus::Active;
        if reminder.next_run_at.is_none() {
            reminder.next_run_at = compute_next_run(
                reminder.target_at,
                reminder.repeat,
                reminder.lead_minutes,
                ctx.sys.get_timestamp_millis(),
            );
        }

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::{DateTime, Utc};
    use petsync_reminders_domain::Cadence;
    use petsync_reminders_infra::FakeSys;
    use std::sync::Arc;

    fn millis(datetime: &str) -> i64 {
        datetime
            .parse::<DateTime<Utc>>()
            .unwrap()
            .timestamp_millis()
    }

    #[tokio::test]
    async fn resuming_a_paused_reminder_keeps_its_schedule() {
        let ctx = PetsyncContext::create_inmemory();
        let owner_id = ID::new();

        let mut reminder = Reminder::new(owner_id.clone(), "Walk".into(), 0);
        reminder.status = ReminderStatus::Paused;
        reminder.next_run_at = Some(5000);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let usecase = ResumeReminderUseCase {
            owner_id,
            reminder_id: reminder.id.clone(),
        };
        let resumed = execute(usecase, &ctx).await.unwrap();
        assert_eq!(resumed.status, ReminderStatus::Active);
        assert_eq!(resumed.next_run_at, Some(5000));
    }

    #[tokio::test]
    async fn resuming_a_completed_recurring_reminder_reschedules_it() {
        let now = millis("2025-06-10T08:00:00Z");
        let mut ctx = PetsyncContext::create_inmemory();
        ctx.sys = Arc::new(FakeSys::new(now));
        let owner_id = ID::new();

        let mut reminder = Reminder::new(owner_id.clone(), "Feed".into(), 0);
        reminder.repeat = Cadence::Daily;
        reminder.status = ReminderStatus::Done;
        reminder.next_run_at = None;
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let usecase = ResumeReminderUseCase {
            owner_id,
            reminder_id: reminder.id.clone(),
        };
        let resumed = execute(usecase, &ctx).await.unwrap();
        assert_eq!(resumed.status, ReminderStatus::Active);
        assert_eq!(
            resumed.next_run_at,
            Some(millis("2025-06-11T08:00:00Z"))
        );
    }
}
