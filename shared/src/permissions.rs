//! Operator role gate
//!
//! Maps an operator role to the set of actions the UI may offer. This only
//! decides what gets rendered; the backend performs the real authorization.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Dashboard operator role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[serde(alias = "admin", alias = "Admin")]
    Admin,
    #[serde(alias = "manager", alias = "Manager")]
    Manager,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
        }
    }
}

/// A mutation affordance that may be rendered for an entity row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Verify,
    Reject,
    Deactivate,
    Reactivate,
    Block,
    Unblock,
    Delete,
    GenerateCertificate,
    SendNotice,
    EditPlans,
    CreateOperator,
}

const MANAGER_ACTIONS: &[Action] = &[
    Action::Verify,
    Action::Reject,
    Action::Deactivate,
    Action::Reactivate,
    Action::GenerateCertificate,
    Action::SendNotice,
    Action::EditPlans,
];

const ADMIN_ONLY_ACTIONS: &[Action] = &[
    Action::Block,
    Action::Unblock,
    Action::Delete,
    Action::CreateOperator,
];

impl Action {
    /// Destructive actions need an explicit confirmation before dispatch
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Self::Block | Self::Delete | Self::Reject)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Verify => "verify",
            Self::Reject => "reject",
            Self::Deactivate => "deactivate",
            Self::Reactivate => "reactivate",
            Self::Block => "block",
            Self::Unblock => "unblock",
            Self::Delete => "delete",
            Self::GenerateCertificate => "generate certificate",
            Self::SendNotice => "send notice",
            Self::EditPlans => "edit plans",
            Self::CreateOperator => "create operator",
        };
        f.write_str(name)
    }
}

/// Actions a role may see
pub fn allowed_actions(role: Role) -> BTreeSet<Action> {
    let mut actions: BTreeSet<Action> = MANAGER_ACTIONS.iter().copied().collect();
    if role == Role::Admin {
        actions.extend(ADMIN_ONLY_ACTIONS.iter().copied());
    }
    actions
}

/// Whether `role` may see `action`
pub fn can(role: Role, action: Action) -> bool {
    match role {
        Role::Admin => true,
        Role::Manager => MANAGER_ACTIONS.contains(&action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_actions_are_subset_of_admin() {
        let admin = allowed_actions(Role::Admin);
        let manager = allowed_actions(Role::Manager);
        assert!(manager.is_subset(&admin));
        assert!(manager.len() < admin.len());
    }

    #[test]
    fn test_admin_only_actions() {
        for action in [Action::Delete, Action::Block, Action::CreateOperator] {
            assert!(can(Role::Admin, action));
            assert!(!can(Role::Manager, action));
        }
    }

    #[test]
    fn test_can_agrees_with_allowed_actions() {
        for role in [Role::Admin, Role::Manager] {
            let allowed = allowed_actions(role);
            for action in ADMIN_ONLY_ACTIONS.iter().chain(MANAGER_ACTIONS) {
                assert_eq!(can(role, *action), allowed.contains(action));
            }
        }
    }

    #[test]
    fn test_role_accepts_lowercase() {
        let role: Role = serde_json::from_str(r#""admin""#).unwrap();
        assert_eq!(role, Role::Admin);
        let role: Role = serde_json::from_str(r#""MANAGER""#).unwrap();
        assert_eq!(role, Role::Manager);
    }
}
