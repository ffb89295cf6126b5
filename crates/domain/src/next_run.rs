use crate::date::add_calendar_months;
use crate::reminder::Cadence;

const MINUTE_MILLIS: i64 = 60 * 1000;
const DAY_MILLIS: i64 = 24 * 60 * MINUTE_MILLIS;

fn advance_one_cycle(millis: i64, repeat: Cadence) -> i64 {
    match repeat {
        // One-shots never enter the catch-up loop
        Cadence::None => millis,
        Cadence::Daily => millis + DAY_MILLIS,
        Cadence::Weekly => millis + 7 * DAY_MILLIS,
        Cadence::Monthly => add_calendar_months(millis, 1),
    }
}

/// Computes the next UTC instant (millis) at which a reminder should fire.
///
/// The candidate fire instant is `target_at - lead_minutes`, anchored to
/// `now` when a recurring reminder has no explicit target. A one-shot keeps
/// that instant as-is even when it is already in the past: the poller fires
/// it on its next tick and closes it out. A recurring reminder is advanced
/// cycle by cycle until the instant is strictly after `now`, silently
/// skipping any number of missed occurrences.
///
/// Returns `None` when there is nothing to schedule.
pub fn compute_next_run(
    target_at: Option<i64>,
    repeat: Cadence,
    lead_minutes: i64,
    now: i64,
) -> Option<i64> {
    let base = match target_at {
        Some(target) => target,
        None if repeat == Cadence::None => return None,
        // A recurring reminder without an explicit target anchors its
        // first cycle to the current instant
        None => now,
    };

    let fire_at = base - lead_minutes * MINUTE_MILLIS;

    if repeat == Cadence::None {
        return Some(fire_at);
    }

    let mut next = fire_at;
    while next <= now {
        next = advance_one_cycle(next, repeat);
    }
    Some(next)
}
