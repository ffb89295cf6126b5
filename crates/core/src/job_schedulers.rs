use crate::reminder::ProcessDueRemindersUseCase;
use crate::shared::usecase::execute;
use petsync_reminders_infra::PetsyncContext;
use std::time::Duration;
use tracing::info;

pub fn start_job_schedulers(ctx: PetsyncContext) {
    start_process_due_reminders_job(ctx);
}

/// Spawns the background loop that polls for due reminders. The first tick
/// is aligned to a minute boundary so that fire instants drift as little
/// as possible from the wall clock minute users think in.
pub fn start_process_due_reminders_job(ctx: PetsyncContext) {
    tokio::spawn(async move {
        let now = ctx.sys.get_timestamp_millis() as usize / 1000;
        let start_delay = get_start_delay(now, 0);
        tokio::time::sleep(Duration::from_secs(start_delay as u64)).await;

        let mut interval =
            tokio::time::interval(Duration::from_secs(ctx.config.poll_interval_secs));
        loop {
            interval.tick().await;
            let usecase = ProcessDueRemindersUseCase {
                batch_size: ctx.config.due_batch_size,
            };
            if let Ok(batch) = execute(usecase, &ctx).await {
                if batch.dispatched > 0 || batch.failed > 0 {
                    info!(
                        "Processed due reminders. Dispatched: {}, rescheduled: {}, completed: {}, failed: {}",
                        batch.dispatched, batch.rescheduled, batch.completed, batch.failed
                    );
                }
            }
        }
    });
}

/// Finds out how many seconds to wait before starting pollers that need to run
/// a given number of seconds before every minute
pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let mod_min = now_ts % 60;
    if mod_min + secs_before_min < 60 {
        60 - mod_min - secs_before_min
    } else {
        60 - (mod_min + secs_before_min - 60)
    }
}
