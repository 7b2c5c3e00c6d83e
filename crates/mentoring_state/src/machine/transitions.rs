//! Case transitions - FSM transition logic
//!
//! Implements the machine that drives a single mentoring case. One event is
//! processed to completion at a time: guard check, state change, and context
//! mutation happen as one unit, or not at all.

use thiserror::Error;

use super::clock::Clock;
use super::context::{CaseContext, Priority, UserId};
use super::events::{CaseEvent, EventKind};
use super::policy::RolePolicy;
use super::states::CaseState;

/// A rejected event. Rejections never mutate the machine; the caller can
/// retry, drop the event, or surface the reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("user {user_id} is not authorized to send {event} in state {state:?}")]
    Unauthorized {
        user_id: UserId,
        event: EventKind,
        state: CaseState,
    },

    #[error("no transition from {state:?} on {event}")]
    InvalidTransition { state: CaseState, event: EventKind },
}

/// Represents an applied state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: CaseState,
    /// The state after the transition.
    pub to: CaseState,
    /// The event that triggered the transition.
    pub event: CaseEvent,
    /// Whether the state actually changed (feedback fills are applied
    /// self-transitions and report `false`).
    pub changed: bool,
}

/// State machine for one mentoring case.
///
/// Owns the case context exclusively; hosts driving many cases hold one
/// machine per case. Role checks and the date source are injected.
#[derive(Debug, Clone)]
pub struct CaseMachine<P, C> {
    current_state: CaseState,
    context: CaseContext,
    policy: P,
    clock: C,
    /// Transition history (limited).
    history: Vec<StateTransition>,
    max_history: usize,
}

impl<P: RolePolicy, C: Clock> CaseMachine<P, C> {
    /// Create a fresh case in `Pending` with an empty context.
    pub fn new(policy: P, clock: C) -> Self {
        Self {
            current_state: CaseState::Pending,
            context: CaseContext::default(),
            policy,
            clock,
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Rehydrate a persisted case at a specific state.
    ///
    /// The context's `status` field is re-synced to the state's phase so a
    /// stale snapshot cannot smuggle in a mismatched status.
    pub fn resume(state: CaseState, mut context: CaseContext, policy: P, clock: C) -> Self {
        context.status = state.phase();
        Self {
            current_state: state,
            context,
            policy,
            clock,
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> CaseState {
        self.current_state
    }

    /// Get the case context snapshot.
    pub fn context(&self) -> &CaseContext {
        &self.context
    }

    /// Get the transition history.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Event kinds that have a transition defined from the current state,
    /// guards aside. Used by callers to render available actions.
    pub fn available_events(&self) -> Vec<EventKind> {
        use CaseState::*;
        let mut events = match self.current_state {
            Pending => vec![EventKind::MakeRequest],
            MentorRequested => vec![EventKind::AssignManager],
            ManagerAssigned => vec![EventKind::CreateChat],
            ChatCreated => vec![EventKind::FindMentor],
            MentorFound => vec![EventKind::AddMentorIntoChat],
            MentorAddedIntoChat => vec![EventKind::StartMentoring],
            MentoringStarted => vec![EventKind::FinishMentoring],
            CollectingFeedback => vec![
                EventKind::FillMentorFeedback,
                EventKind::FillRequesterFeedback,
                EventKind::FillMenteeFeedback,
                EventKind::Complete,
            ],
            Finish => Vec::new(),
        };
        // The mentor-replacement loop is reachable from any state that
        // currently has a confirmed mentor.
        if self.context.mentor_id.is_some() {
            events.push(EventKind::ChangeMentor);
        }
        events
    }

    /// Check if an event has a transition defined right now, guards aside.
    pub fn can_handle(&self, event: &CaseEvent) -> bool {
        self.available_events().contains(&event.kind())
    }

    /// Apply one event on behalf of `acting_user`.
    ///
    /// At most one transition fires. On `Err` the machine is untouched:
    /// [`TransitionError::Unauthorized`] when a role guard rejects the
    /// acting user, [`TransitionError::InvalidTransition`] when the event
    /// has no transition from the current state.
    pub fn send(
        &mut self,
        event: CaseEvent,
        acting_user: UserId,
    ) -> Result<StateTransition, TransitionError> {
        let from = self.current_state;
        let to = match self.apply(from, &event, acting_user) {
            Ok(to) => to,
            Err(err) => {
                tracing::debug!(
                    state = ?from,
                    event = %event.kind(),
                    user_id = acting_user,
                    %err,
                    "case event rejected"
                );
                return Err(err);
            }
        };

        self.current_state = to;
        // The status mirror always follows the state's phase, including
        // across the lateral mentor-replacement loop.
        self.context.status = to.phase();

        tracing::info!(
            from = ?from,
            to = ?to,
            event = %event.kind(),
            user_id = acting_user,
            "case transition applied"
        );

        let transition = StateTransition {
            from,
            to,
            event,
            changed: from != to,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        Ok(transition)
    }

    /// The transition table. Mutates the context only after the arm's guard
    /// has passed, so a rejection can never leave partial writes behind.
    fn apply(
        &mut self,
        state: CaseState,
        event: &CaseEvent,
        acting_user: UserId,
    ) -> Result<CaseState, TransitionError> {
        use CaseEvent::*;
        use CaseState::*;

        match (state, event) {
            (
                Pending,
                MakeRequest {
                    requester_id,
                    mentee_id,
                    technologies,
                    comment,
                },
            ) => {
                self.context.requester_id = Some(*requester_id);
                self.context.mentee_id = Some(*mentee_id);
                self.context.technologies = technologies.clone();
                self.context.comment = Some(comment.clone());
                self.context.request_date = Some(self.clock.today());
                self.context.priority = Some(Priority::Low);
                Ok(MentorRequested)
            }

            (MentorRequested, AssignManager) => {
                self.require_lnd_manager(state, event, acting_user)?;
                self.context.manager_id = Some(acting_user);
                Ok(ManagerAssigned)
            }

            (ManagerAssigned, CreateChat) => {
                self.require_lnd_manager(state, event, acting_user)?;
                Ok(ChatCreated)
            }

            (ChatCreated, FindMentor { mentor_id }) => {
                self.require_lnd_manager(state, event, acting_user)?;
                self.context.mentor_id = Some(*mentor_id);
                Ok(MentorFound)
            }

            (MentorFound, AddMentorIntoChat) => Ok(MentorAddedIntoChat),

            (MentorAddedIntoChat, StartMentoring { program }) => {
                self.require_mentor(state, event, acting_user)?;
                self.context.start_date = Some(self.clock.today());
                self.context.program = Some(*program);
                Ok(MentoringStarted)
            }

            (MentoringStarted, FinishMentoring) => {
                self.require_mentor(state, event, acting_user)?;
                Ok(CollectingFeedback)
            }

            (CollectingFeedback, FillMentorFeedback { feedback }) => {
                self.context.mentor_feedback.push(feedback.clone());
                Ok(CollectingFeedback)
            }

            (CollectingFeedback, FillRequesterFeedback { feedback }) => {
                self.context.requester_feedback.push(feedback.clone());
                Ok(CollectingFeedback)
            }

            (CollectingFeedback, FillMenteeFeedback { feedback }) => {
                self.context.mentee_feedback.push(feedback.clone());
                Ok(CollectingFeedback)
            }

            (CollectingFeedback, Complete) => {
                self.context.completed_date = Some(self.clock.today());
                Ok(Finish)
            }

            // Lateral loop: swap the mentor out from any state that has one.
            (_, ChangeMentor) if self.context.mentor_id.is_some() => {
                self.require_lnd_manager(state, event, acting_user)?;
                if let Some(previous) = self.context.mentor_id.take() {
                    self.context.candidates_history.push(previous);
                }
                Ok(ChatCreated)
            }

            _ => Err(TransitionError::InvalidTransition {
                state,
                event: event.kind(),
            }),
        }
    }

    fn require_lnd_manager(
        &self,
        state: CaseState,
        event: &CaseEvent,
        user_id: UserId,
    ) -> Result<(), TransitionError> {
        if self.policy.is_lnd_manager(user_id) {
            Ok(())
        } else {
            Err(TransitionError::Unauthorized {
                user_id,
                event: event.kind(),
                state,
            })
        }
    }

    fn require_mentor(
        &self,
        state: CaseState,
        event: &CaseEvent,
        user_id: UserId,
    ) -> Result<(), TransitionError> {
        if self.policy.is_mentor(user_id) {
            Ok(())
        } else {
            Err(TransitionError::Unauthorized {
                user_id,
                event: event.kind(),
                state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::clock::FixedClock;
    use crate::machine::context::{Feedback, Program, Status};
    use crate::machine::policy::StaticRolePolicy;
    use chrono::NaiveDate;

    const MANAGER: UserId = 3;
    const MENTOR: UserId = 5;
    const OUTSIDER: UserId = 99;

    fn machine() -> CaseMachine<StaticRolePolicy, FixedClock> {
        CaseMachine::new(
            StaticRolePolicy::new(&[MANAGER], &[5, 6]),
            FixedClock(NaiveDate::from_ymd_opt(2023, 5, 21).unwrap()),
        )
    }

    fn make_request() -> CaseEvent {
        CaseEvent::MakeRequest {
            requester_id: 1,
            mentee_id: 1,
            technologies: vec!["React".to_string(), "TS".to_string()],
            comment: "comment".to_string(),
        }
    }

    #[test]
    fn test_make_request_stamps_context() {
        let mut sm = machine();
        let t = sm.send(make_request(), 1).unwrap();

        assert!(t.changed);
        assert_eq!(sm.state(), CaseState::MentorRequested);
        assert_eq!(sm.context().technologies, vec!["React", "TS"]);
        assert_eq!(sm.context().status, Some(Status::Requested));
        assert_eq!(sm.context().priority, Some(Priority::Low));
        assert_eq!(
            sm.context().request_date,
            NaiveDate::from_ymd_opt(2023, 5, 21)
        );
    }

    #[test]
    fn test_assign_manager_requires_lnd_role() {
        let mut sm = machine();
        sm.send(make_request(), 1).unwrap();

        let before = sm.context().clone();
        let err = sm.send(CaseEvent::AssignManager, OUTSIDER).unwrap_err();
        assert!(matches!(
            err,
            TransitionError::Unauthorized {
                user_id: OUTSIDER,
                ..
            }
        ));
        assert_eq!(sm.state(), CaseState::MentorRequested);
        assert_eq!(sm.context(), &before);

        sm.send(CaseEvent::AssignManager, MANAGER).unwrap();
        assert_eq!(sm.state(), CaseState::ManagerAssigned);
        assert_eq!(sm.context().manager_id, Some(MANAGER));
        assert_eq!(sm.context().status, Some(Status::Planned));
    }

    #[test]
    fn test_unmatched_event_is_distinguishable_noop() {
        let mut sm = machine();
        let before = sm.context().clone();

        let err = sm.send(CaseEvent::Complete, MANAGER).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                state: CaseState::Pending,
                event: EventKind::Complete,
            }
        );
        assert_eq!(sm.state(), CaseState::Pending);
        assert_eq!(sm.context(), &before);
        assert!(sm.history().is_empty());
    }

    #[test]
    fn test_change_mentor_appends_history_and_clears_mentor() {
        let mut sm = machine();
        sm.send(make_request(), 1).unwrap();
        sm.send(CaseEvent::AssignManager, MANAGER).unwrap();
        sm.send(CaseEvent::CreateChat, MANAGER).unwrap();
        sm.send(CaseEvent::FindMentor { mentor_id: 6 }, MANAGER)
            .unwrap();
        sm.send(CaseEvent::AddMentorIntoChat, MANAGER).unwrap();
        sm.send(
            CaseEvent::StartMentoring {
                program: Program::Individual,
            },
            MENTOR,
        )
        .unwrap();
        assert_eq!(sm.context().status, Some(Status::InProgress));

        sm.send(CaseEvent::ChangeMentor, MANAGER).unwrap();
        assert_eq!(sm.state(), CaseState::ChatCreated);
        assert_eq!(sm.context().mentor_id, None);
        assert_eq!(sm.context().candidates_history, vec![6]);
        // Status follows the state back out of IN_PROGRESS.
        assert_eq!(sm.context().status, Some(Status::Planned));
    }

    #[test]
    fn test_change_mentor_without_mentor_is_invalid() {
        let mut sm = machine();
        sm.send(make_request(), 1).unwrap();

        let err = sm.send(CaseEvent::ChangeMentor, MANAGER).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTransition { .. }));
        assert!(sm.context().candidates_history.is_empty());
    }

    #[test]
    fn test_feedback_fills_are_self_transitions() {
        let mut sm = CaseMachine::resume(
            CaseState::CollectingFeedback,
            CaseContext::default(),
            StaticRolePolicy::new(&[MANAGER], &[MENTOR]),
            FixedClock(NaiveDate::from_ymd_opt(2023, 5, 21).unwrap()),
        );

        let t = sm
            .send(
                CaseEvent::FillMentorFeedback {
                    feedback: Feedback {
                        message: "solid progress".to_string(),
                        rating: 6,
                    },
                },
                MENTOR,
            )
            .unwrap();

        assert!(!t.changed);
        assert_eq!(sm.state(), CaseState::CollectingFeedback);
        assert_eq!(sm.context().mentor_feedback.len(), 1);
        assert!(sm.context().requester_feedback.is_empty());
    }

    #[test]
    fn test_resume_resyncs_status() {
        let stale = CaseContext {
            status: Some(Status::Done),
            ..Default::default()
        };
        let sm = CaseMachine::resume(
            CaseState::MentoringStarted,
            stale,
            StaticRolePolicy::new(&[MANAGER], &[MENTOR]),
            FixedClock(NaiveDate::from_ymd_opt(2023, 5, 21).unwrap()),
        );
        assert_eq!(sm.context().status, Some(Status::InProgress));
    }

    #[test]
    fn test_available_events_track_state_and_mentor() {
        let mut sm = machine();
        assert_eq!(sm.available_events(), vec![EventKind::MakeRequest]);

        sm.send(make_request(), 1).unwrap();
        sm.send(CaseEvent::AssignManager, MANAGER).unwrap();
        sm.send(CaseEvent::CreateChat, MANAGER).unwrap();
        assert_eq!(sm.available_events(), vec![EventKind::FindMentor]);
        assert!(!sm.can_handle(&CaseEvent::ChangeMentor));

        sm.send(CaseEvent::FindMentor { mentor_id: 6 }, MANAGER)
            .unwrap();
        assert!(sm.available_events().contains(&EventKind::ChangeMentor));
        assert!(sm.can_handle(&CaseEvent::ChangeMentor));
    }

    #[test]
    fn test_history_tracking() {
        let mut sm = machine();
        sm.send(make_request(), 1).unwrap();
        sm.send(CaseEvent::AssignManager, MANAGER).unwrap();

        assert_eq!(sm.history().len(), 2);
        assert_eq!(sm.history()[0].from, CaseState::Pending);
        assert_eq!(sm.history()[1].to, CaseState::ManagerAssigned);
    }
}
