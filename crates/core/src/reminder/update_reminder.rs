use super::{validate_schedule, MESSAGE_MAX_LEN, TITLE_MAX_LEN};
use crate::error::PetsyncError;
use crate::shared::usecase::UseCase;
use petsync_reminders_domain::{compute_next_run, Cadence, Metadata, Reminder, ReminderStatus, ID};
use petsync_reminders_infra::PetsyncContext;

/// Partially updates a reminder. `None` fields are left untouched. Any
/// change to the schedule inputs recomputes the fire instant.
#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub owner_id: ID,
    pub reminder_id: ID,
    pub title: Option<String>,
    pub message: Option<String>,
    pub pet_id: Option<ID>,
    pub target_at: Option<i64>,
    pub repeat: Option<Cadence>,
    pub lead_minutes: Option<i64>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidField(String),
    Storage,
}

impl From<UseCaseError> for PetsyncError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::InvalidField(msg) => Self::BadClientData(msg),
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &PetsyncContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = ctx
            .repos
            .reminders
            .find_by_owner(&self.owner_id, &self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        if let Some(title) = &self.title {
            let title = title.trim();
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
            reminder.title = title.to_string();
        }
        if let Some(message) = &self.message {
            if message.chars().count() > MESSAGE_MAX_LEN {
                return Err(UseCaseError::InvalidField(format!(
                    "The message cannot be longer than {} characters",
                    MESSAGE_MAX_LEN
                )));
            }
            reminder.message = Some(message.clone());
        }
        if let Some(lead_minutes) = self.lead_minutes {
            reminder.lead_minutes = lead_minutes;
        }
        if let Some(pet_id) = &self.pet_id {
            reminder.pet_id = Some(pet_id.clone());
        }
        if let Some(target_at) = self.target_at {
            reminder.target_at = Some(target_at);
        }
        if let Some(repeat) = self.repeat {
            reminder.repeat = repeat;
        }
        if let Some(metadata) = &self.metadata {
            reminder.metadata = metadata.clone();
        }

        // The merged schedule is what gets recomputed, so it is what must
        // hold up to the range checks
        validate_schedule(reminder.target_at, reminder.lead_minutes)
            .map_err(UseCaseError::InvalidField)?;

        // A completed reminder stays unscheduled. Resuming is the path
        // back to an active schedule.
        reminder.next_run_at = match reminder.status {
            ReminderStatus::Done => None,
            _ => compute_next_run(
                reminder.target_at,
                reminder.repeat,
                reminder.lead_minutes,
                ctx.sys.get_timestamp_millis(),
            ),
        };

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        Ok(reminder)
    }
}
