//! mentoring_state - State machine and FSM logic for mentoring cases
//!
//! This crate provides the state machine implementation for managing the
//! lifecycle of a single mentoring case, from request through completion,
//! with role-guarded transitions and an accumulating case context.

pub mod machine;

// Re-export commonly used types
pub use machine::{
    CaseContext, CaseEvent, CaseMachine, CaseState, Clock, EventKind, Feedback, FixedClock,
    Priority, Program, RolePolicy, StateTransition, StaticRolePolicy, Status, SystemClock,
    TransitionError, UserId, DATE_FORMAT,
};
