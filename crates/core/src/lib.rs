mod error;
mod job_schedulers;
mod reminder;
mod shared;

pub use error::PetsyncError;
pub use job_schedulers::{start_job_schedulers, start_process_due_reminders_job};
pub use reminder::{
    CreateReminderUseCase, DeleteReminderUseCase, GetReminderUseCase, ListRemindersUseCase,
    PagedReminders, PauseReminderUseCase, ProcessDueRemindersUseCase, ProcessedBatch,
    ResumeReminderUseCase, UpdateReminderUseCase,
};
pub use shared::usecase::{execute, UseCase};
