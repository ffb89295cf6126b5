use crate::shared::entity::ID;
use crate::shared::metadata::Metadata;
use serde::{Deserialize, Serialize};

/// Recurrence kind of a `Reminder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Active,
    Paused,
    Done,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Active => "active",
            ReminderStatus::Paused => "paused",
            ReminderStatus::Done => "done",
        }
    }
}

/// A `Reminder` is a user-owned notification request: fire at
/// `next_run_at`, which is derived from the nominal `target_at` instant,
/// the recurrence `repeat` and the `lead_minutes` advance warning.
///
/// All timestamps are UTC millis.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The user this reminder belongs to. Immutable after creation.
    pub owner_id: ID,
    /// Optional associated pet. Informational only, never used by the
    /// scheduling logic.
    pub pet_id: Option<ID>,
    pub title: String,
    pub message: Option<String>,
    /// The nominal event instant the reminder is about (e.g. a vaccine
    /// due date). Optional when `repeat` is recurring.
    pub target_at: Option<i64>,
    pub repeat: Cadence,
    /// How many minutes before `target_at` the notification should fire.
    pub lead_minutes: i64,
    /// The next instant at which this reminder should fire. Absent means
    /// nothing is scheduled (completed one-shot, or no schedulable basis).
    pub next_run_at: Option<i64>,
    pub status: ReminderStatus,
    pub metadata: Metadata,
    pub created_at: i64,
}

impl Reminder {
    pub fn new(owner_id: ID, title: String, created_at: i64) -> Self {
        Self {
            id: ID::new(),
            owner_id,
            pet_id: None,
            title,
            message: None,
            target_at: None,
            repeat: Cadence::None,
            lead_minutes: 0,
            next_run_at: None,
            status: ReminderStatus::Active,
            metadata: Metadata::new(),
            created_at,
        }
    }
}
