use crate::error::PetsyncError;
use crate::shared::usecase::UseCase;
use petsync_reminders_domain::{Reminder, ReminderStatus, ID};
use petsync_reminders_infra::PetsyncContext;

/// Suspends dispatch for a reminder. The fire instant is kept so that a
/// later resume picks up where the schedule left off.
#[derive(Debug)]
pub struct PauseReminderUseCase {
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
impl UseCase for PauseReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "PauseReminder";

    async fn execute(&mut self, ctx: &PetsyncContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = ctx
            .repos
            .reminders
            .find_by_owner(&self.owner_id, &self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        reminder.status = ReminderStatus::Paused;

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

    #[tokio::test]
    async fn pausing_keeps_the_fire_instant() {
        let ctx = PetsyncContext::create_inmemory();
        let owner_id = ID::new();

        let mut reminder = Reminder::new(owner_id.clone(), "Walk".into(), 0);
        reminder.next_run_at = Some(5000);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let usecase = PauseReminderUseCase {
            owner_id,
            reminder_id: reminder.id.clone(),
        };
        let paused = execute(usecase, &ctx).await.unwrap();
        assert_eq!(paused.status, ReminderStatus::Paused);
        assert_eq!(paused.next_run_at, Some(5000));
    }
}
