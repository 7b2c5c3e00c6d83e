//! Authorization policy - Who counts as an L&D manager or mentor
//!
//! The machine never owns the role sets; it depends on this capability so
//! a host application can plug in whatever directory it keeps, and tests
//! can substitute arbitrary policies.

use std::collections::HashSet;

use super::context::UserId;

/// Role checks the transition guards evaluate against the acting user.
pub trait RolePolicy {
    fn is_lnd_manager(&self, user_id: UserId) -> bool;
    fn is_mentor(&self, user_id: UserId) -> bool;
}

/// Fixed role sets supplied up front, the usual host configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticRolePolicy {
    lnd_managers: HashSet<UserId>,
    mentors: HashSet<UserId>,
}

impl StaticRolePolicy {
    pub fn new(lnd_managers: &[UserId], mentors: &[UserId]) -> Self {
        Self {
            lnd_managers: lnd_managers.iter().copied().collect(),
            mentors: mentors.iter().copied().collect(),
        }
    }
}

impl RolePolicy for StaticRolePolicy {
    fn is_lnd_manager(&self, user_id: UserId) -> bool {
        self.lnd_managers.contains(&user_id)
    }

    fn is_mentor(&self, user_id: UserId) -> bool {
        self.mentors.contains(&user_id)
    }
}
