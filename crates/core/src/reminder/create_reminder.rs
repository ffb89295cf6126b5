use super::{validate_schedule, MESSAGE_MAX_LEN, TITLE_MAX_LEN};
use crate::error::PetsyncError;
use crate::shared::usecase::UseCase;
use petsync_reminders_domain::{compute_next_run, Cadence, Metadata, Reminder, ID};
use petsync_reminders_infra::PetsyncContext;

/// Creates a reminder for a user and schedules its first fire instant.
#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub owner_id: ID,
    pub title: String,
    pub message: Option<String>,
    pub pet_id: Option<ID>,
    /// Nominal event instant in UTC millis
    pub target_at: Option<i64>,
    pub repeat: Option<Cadence>,
    pub lead_minutes: Option<i64>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidField(String),
    Storage,
}

impl From<UseCaseError> for PetsyncError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidField(msg) => Self::BadClientData(msg),
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &PetsyncContext) -> Result<Self::Response, Self::Error> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(UseCaseError::InvalidField(
                "A reminder must have a title".into(),
            ));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(UseCaseError::InvalidField(format!(
                "The title cannot be longer than {} characters",
                TITLE_MAX_LEN
            )));
        }
        if let Some(message) = &self.message {
            if message.chars().count() > MESSAGE_MAX_LEN {
                return Err(UseCaseError::InvalidField(format!(
                    "The message cannot be longer than {} characters",
                    MESSAGE_MAX_LEN
                )));
            }
        }
        let lead_minutes = self.lead_minutes.unwrap_or(0);
        validate_schedule(self.target_at, lead_minutes).map_err(UseCaseError::InvalidField)?;

        let now = ctx.sys.get_timestamp_millis();

        let mut reminder = Reminder::new(self.owner_id.clone(), title.to_string(), now);
        reminder.message = self.message.clone();
        reminder.pet_id = self.pet_id.clone();
        reminder.target_at = self.target_at;
        reminder.repeat = self.repeat.unwrap_or_default();
        reminder.lead_minutes = lead_minutes;
        reminder.metadata = self.metadata.clone().unwrap_or_default();
        reminder.next_run_at = compute_next_run(
            reminder.target_at,
            reminder.repeat,
            reminder.lead_minutes,
            now,
        );

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        Ok(reminder)
    }
}
