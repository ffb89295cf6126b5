mod create_reminder;
mod delete_reminder;
mod get_reminder;
mod list_reminders;
mod pause_reminder;
mod process_due_reminders;
mod resume_reminder;
mod update_reminder;

pub use create_reminder::CreateReminderUseCase;
pub use delete_reminder::DeleteReminderUseCase;
pub use get_reminder::GetReminderUseCase;
pub use list_reminders::{ListRemindersUseCase, PagedReminders};
pub use pause_reminder::PauseReminderUseCase;
pub use process_due_reminders::{ProcessDueRemindersUseCase, ProcessedBatch};
pub use resume_reminder::ResumeReminderUseCase;
pub use update_reminder::UpdateReminderUseCase;

pub(crate) const TITLE_MAX_LEN: usize = 100;
pub(crate) const MESSAGE_MAX_LEN: usize = 300;

// Bounds for caller supplied schedule inputs. They keep the next-run
// arithmetic well inside the representable datetime range, so extreme
// values are rejected up front instead of corrupting a schedule.
/// 9999-12-31T23:59:59.999Z
pub(crate) const TARGET_AT_MAX: i64 = 253_402_300_799_999;
/// One leap year of minutes
pub(crate) const LEAD_MINUTES_MAX: i64 = 527_040;

pub(crate) fn validate_schedule(target_at: Option<i64>, lead_minutes: i64) -> Result<(), String> {
    if !(0..=LEAD_MINUTES_MAX).contains(&lead_minutes) {
        return Err(format!(
            "lead_minutes must be between 0 and {}",
            LEAD_MINUTES_MAX
        ));
    }
    if let Some(target_at) = target_at {
        if !(0..=TARGET_AT_MAX).contains(&target_at) {
            return Err("target_at is outside the supported date range".into());
        }
    }
    Ok(())
}
