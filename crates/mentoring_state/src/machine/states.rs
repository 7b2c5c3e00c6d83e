//! Case states - Defines all possible states of a mentoring case
//!
//! The lifecycle is strictly forward except for one lateral loop back to
//! `ChatCreated` when the mentor is replaced.

use serde::{Deserialize, Serialize};

use super::context::Status;

/// Defines the possible states of a mentoring case's lifecycle.
///
/// Each step of the intake-to-completion pipeline has an explicit state
/// rather than a set of flags on the context.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    /// Nothing has been requested yet.
    Pending,

    /// A team member has asked for mentoring.
    MentorRequested,

    /// An L&D manager has taken ownership of the case.
    ManagerAssigned,

    /// The coordination chat for the case exists.
    ChatCreated,

    /// A mentor candidate has been selected.
    MentorFound,

    /// The mentor has joined the case chat.
    MentorAddedIntoChat,

    /// Mentoring sessions are running.
    MentoringStarted,

    /// Mentoring is over; feedback forms are being collected.
    CollectingFeedback,

    /// The case is closed (terminal state).
    Finish,
}

impl Default for CaseState {
    fn default() -> Self {
        CaseState::Pending
    }
}

impl CaseState {
    /// The semantic phase mirrored into `CaseContext::status`.
    ///
    /// `Pending` has no phase yet; every other state maps onto exactly one
    /// status value. The machine re-syncs the context from this mapping
    /// after each applied transition.
    pub fn phase(&self) -> Option<Status> {
        match self {
            Self::Pending => None,
            Self::MentorRequested => Some(Status::Requested),
            Self::ManagerAssigned
            | Self::ChatCreated
            | Self::MentorFound
            | Self::MentorAddedIntoChat => Some(Status::Planned),
            Self::MentoringStarted => Some(Status::InProgress),
            Self::CollectingFeedback => Some(Status::Retro),
            Self::Finish => Some(Status::Done),
        }
    }

    /// Check if this is a terminal state (no forward transitions remain).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish)
    }

    /// Get a human-readable description of the current state.
    pub fn description(&self) -> &str {
        match self {
            Self::Pending => "Awaiting a mentoring request",
            Self::MentorRequested => "Mentoring requested",
            Self::ManagerAssigned => "L&D manager assigned",
            Self::ChatCreated => "Case chat created",
            Self::MentorFound => "Mentor selected",
            Self::MentorAddedIntoChat => "Mentor joined the chat",
            Self::MentoringStarted => "Mentoring in progress",
            Self::CollectingFeedback => "Collecting feedback",
            Self::Finish => "Completed",
        }
    }
}
