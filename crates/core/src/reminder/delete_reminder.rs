use crate::error::PetsyncError;
use crate::shared::usecase::UseCase;
use petsync_reminders_domain::ID;
use petsync_reminders_infra::PetsyncContext;

#[derive(Debug)]
pub struct DeleteReminderUseCase {
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
impl UseCase for DeleteReminderUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &PetsyncContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .delete_by_owner(&self.owner_id, &self.reminder_id)
            .await
            .map(|_| ())
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))
    }
}
