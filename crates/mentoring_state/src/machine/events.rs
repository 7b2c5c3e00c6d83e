//! Case events - Defines events that trigger state transitions
//!
//! Payloads ride inside the event variants; the acting user is passed
//! separately to [`CaseMachine::send`](super::transitions::CaseMachine::send)
//! because every guarded transition needs it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::context::{Feedback, Program, UserId};

/// Defines the events that can trigger state transitions in the case FSM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseEvent {
    /// A team member files a mentoring request.
    MakeRequest {
        requester_id: UserId,
        mentee_id: UserId,
        technologies: Vec<String>,
        comment: String,
    },

    /// The acting L&D manager takes ownership of the case.
    AssignManager,

    /// The case coordination chat is created.
    CreateChat,

    /// A mentor candidate was selected.
    FindMentor { mentor_id: UserId },

    /// The selected mentor joined the case chat.
    AddMentorIntoChat,

    /// The mentor kicks off the sessions.
    StartMentoring { program: Program },

    /// The mentor declares the sessions over.
    FinishMentoring,

    /// Feedback form submissions, one event per form.
    FillMentorFeedback { feedback: Feedback },
    FillRequesterFeedback { feedback: Feedback },
    FillMenteeFeedback { feedback: Feedback },

    /// Close out the case.
    Complete,

    /// Replace the current mentor; valid from any state that has one.
    ChangeMentor,
}

/// Payload-free discriminant of [`CaseEvent`], used for snapshot reads
/// ("which events are valid right now") and in rejection errors.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MakeRequest,
    AssignManager,
    CreateChat,
    FindMentor,
    AddMentorIntoChat,
    StartMentoring,
    FinishMentoring,
    FillMentorFeedback,
    FillRequesterFeedback,
    FillMenteeFeedback,
    Complete,
    ChangeMentor,
}

impl CaseEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MakeRequest { .. } => EventKind::MakeRequest,
            Self::AssignManager => EventKind::AssignManager,
            Self::CreateChat => EventKind::CreateChat,
            Self::FindMentor { .. } => EventKind::FindMentor,
            Self::AddMentorIntoChat => EventKind::AddMentorIntoChat,
            Self::StartMentoring { .. } => EventKind::StartMentoring,
            Self::FinishMentoring => EventKind::FinishMentoring,
            Self::FillMentorFeedback { .. } => EventKind::FillMentorFeedback,
            Self::FillRequesterFeedback { .. } => EventKind::FillRequesterFeedback,
            Self::FillMenteeFeedback { .. } => EventKind::FillMenteeFeedback,
            Self::Complete => EventKind::Complete,
            Self::ChangeMentor => EventKind::ChangeMentor,
        }
    }

    /// Check if this event appends to one of the feedback collections.
    pub fn is_feedback_event(&self) -> bool {
        matches!(
            self,
            Self::FillMentorFeedback { .. }
                | Self::FillRequesterFeedback { .. }
                | Self::FillMenteeFeedback { .. }
        )
    }

    /// Check if this event is gated on an L&D manager or mentor role.
    pub fn is_guarded(&self) -> bool {
        matches!(
            self,
            Self::AssignManager
                | Self::CreateChat
                | Self::FindMentor { .. }
                | Self::StartMentoring { .. }
                | Self::FinishMentoring
                | Self::ChangeMentor
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MakeRequest => "MAKE_REQUEST",
            Self::AssignManager => "ASSIGN_MANAGER",
            Self::CreateChat => "CREATE_CHAT",
            Self::FindMentor => "FIND_MENTOR",
            Self::AddMentorIntoChat => "ADD_MENTOR_INTO_CHAT",
            Self::StartMentoring => "START_MENTORING",
            Self::FinishMentoring => "FINISH_MENTORING",
            Self::FillMentorFeedback => "FILL_MENTOR_FEEDBACK",
            Self::FillRequesterFeedback => "FILL_REQUESTER_FEEDBACK",
            Self::FillMenteeFeedback => "FILL_MENTEE_FEEDBACK",
            Self::Complete => "COMPLETE",
            Self::ChangeMentor => "CHANGE_MENTOR",
        };
        f.write_str(name)
    }
}
