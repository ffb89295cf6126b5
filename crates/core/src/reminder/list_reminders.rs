use crate::error::PetsyncError;
use crate::shared::usecase::UseCase;
use petsync_reminders_domain::{Reminder, ReminderStatus, ID};
use petsync_reminders_infra::{PetsyncContext, ReminderFilters};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Lists an owner's reminders, soonest due first, newest as tie breaker.
#[derive(Debug)]
pub struct ListRemindersUseCase {
    pub owner_id: ID,
    pub pet_id: Option<ID>,
    pub status: Option<ReminderStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug)]
pub struct PagedReminders {
    pub items: Vec<Reminder>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
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
impl UseCase for ListRemindersUseCase {
    type Response = PagedReminders;

    type Error = UseCaseError;

    const NAME: &'static str = "ListReminders";

    async fn execute(&mut self, ctx: &PetsyncContext) -> Result<Self::Response, Self::Error> {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).max(1).min(MAX_LIMIT);
        let skip = (page - 1) * limit;

        let filters = ReminderFilters {
            pet_id: self.pet_id.clone(),
            status: self.status,
        };

        let items = ctx
            .repos
            .reminders
            .list_by_owner(&self.owner_id, &filters, skip, limit)
            .await
            .map_err(|_| UseCaseError::Storage)?;
        let total = ctx
            .repos
            .reminders
            .count_by_owner(&self.owner_id, &filters)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        Ok(PagedReminders {
            items,
            total,
            page,
            limit,
            pages: (total + limit - 1) / limit,
        })
    }
}
