//! Case context - The data record a case accumulates across its lifetime
//!
//! Owned and mutated exclusively by the machine's transition logic; callers
//! only ever see it through snapshot reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier for any participant (requester, mentee, manager, mentor).
pub type UserId = u64;

/// Coarse progress phase mirrored from the machine's current state.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Requested,
    Planned,
    InProgress,
    Retro,
    Done,
}

/// Priority of a case. Every fresh request starts out `Low`.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    High,
}

/// Shape of the mentoring program, fixed once mentoring starts.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Program {
    Individual,
    Group,
}

/// One submitted feedback form entry. Entries are append-only.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub rating: u8,
}

/// The accumulating record attached to one mentoring case.
///
/// Identifier fields stay `None` until the transition that assigns them
/// fires; date stamps are written exactly once, in workflow order
/// (request ≤ start ≤ completed). The feedback vectors and
/// `candidates_history` only ever grow.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct CaseContext {
    /// Team member who filed the request.
    pub requester_id: Option<UserId>,
    /// Person being mentored (may equal the requester).
    pub mentee_id: Option<UserId>,
    /// L&D manager owning the case.
    pub manager_id: Option<UserId>,
    /// Currently confirmed mentor, unset until one is found and after
    /// every replacement.
    pub mentor_id: Option<UserId>,
    /// Previously assigned mentors, oldest first.
    pub candidates_history: Vec<UserId>,

    /// Technology tags the request covers.
    pub technologies: Vec<String>,
    /// Free-text note from the requester.
    pub comment: Option<String>,
    pub priority: Option<Priority>,
    pub program: Option<Program>,
    /// Mirror of the current state's phase; kept in sync by the machine.
    pub status: Option<Status>,

    #[serde(with = "case_date", default)]
    pub request_date: Option<NaiveDate>,
    #[serde(with = "case_date", default)]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "case_date", default)]
    pub completed_date: Option<NaiveDate>,

    pub mentor_feedback: Vec<Feedback>,
    pub requester_feedback: Vec<Feedback>,
    pub mentee_feedback: Vec<Feedback>,
}

/// Serde helper keeping case dates in the `21-05-2023` wire format.
pub mod case_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::super::clock::DATE_FORMAT;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_some(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
