mod date;
mod next_run;
mod reminder;
mod shared;

pub use date::{add_calendar_months, get_month_length, is_leap_year};
pub use next_run::compute_next_run;
pub use reminder::{Cadence, Reminder, ReminderStatus};
pub use shared::entity::{InvalidIDError, ID};
pub use shared::metadata::Metadata;
