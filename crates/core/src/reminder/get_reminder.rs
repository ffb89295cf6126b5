use crate::error::PetsyncError;
use crate::shared::usecase::UseCase;
use petsync_reminders_domain::{Reminder, ID};
use petsync_reminders_infra::PetsyncContext;

#[derive(Debug)]
pub struct GetReminderUseCase {
    pub owner_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for PetsyncError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for GetReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminder";

    async fn execute(&mut self, ctx: &PetsyncContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find_by_owner(&self.owner_id, &self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use petsync_reminders_domain::Reminder;

    #[tokio::test]
    async fn it_returns_not_found_for_foreign_reminders() {
        let ctx = PetsyncContext::create_inmemory();
        let owner_a = ID::new();
        let owner_b = ID::new();

        let reminder = Reminder::new(owner_b.clone(), "b's secret".into(), 0);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        // Owner A probing owner B's id gets the same signal as a
        // nonexistent id
        let usecase = GetReminderUseCase {
            owner_id: owner_a,
            reminder_id: reminder.id.clone(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::NotFound(_))
        ));

        let usecase = GetReminderUseCase {
            owner_id: owner_b,
            reminder_id: reminder.id.clone(),
        };
        let found = execute(usecase, &ctx).await.unwrap();
        assert_eq!(found.id, reminder.id);
    }
}
