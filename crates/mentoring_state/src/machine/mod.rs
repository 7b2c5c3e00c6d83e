//! State machine module
//!
//! Contains the FSM implementation for the mentoring case lifecycle.

mod clock;
mod context;
mod events;
mod policy;
mod states;
mod transitions;

pub use clock::{Clock, FixedClock, SystemClock, DATE_FORMAT};
pub use context::{CaseContext, Feedback, Priority, Program, Status, UserId};
pub use events::{CaseEvent, EventKind};
pub use policy::{RolePolicy, StaticRolePolicy};
pub use states::CaseState;
pub use transitions::{CaseMachine, StateTransition, TransitionError};
