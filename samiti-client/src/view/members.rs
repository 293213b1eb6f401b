//! Member table rows with role-gated actions

use shared::models::{FeeStatus, Member, MembershipStatus};
use shared::permissions::allowed_actions;
use shared::{Action, Role};

use super::RenderState;
use crate::store::ResourceSlice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub id: String,
    pub registration_number: Option<String>,
    pub name: String,
    pub status: MembershipStatus,
    pub payment_status: FeeStatus,
    /// Buttons to show, in display order
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembersView {
    pub state: RenderState,
    pub rows: Vec<MemberRow>,
    /// An action is in flight; buttons are disabled
    pub busy: bool,
}

/// Actions that make sense for the member's current state
pub fn applicable_actions(member: &Member) -> Vec<Action> {
    let mut actions = match member.status {
        MembershipStatus::Pending => vec![Action::Verify, Action::Reject],
        MembershipStatus::Active => vec![Action::Block, Action::Deactivate, Action::SendNotice],
        MembershipStatus::Blocked => vec![Action::Unblock],
        MembershipStatus::Inactive => vec![Action::Reactivate],
    };
    if member.is_certificate_eligible() {
        actions.push(Action::GenerateCertificate);
    }
    actions.push(Action::Delete);
    actions
}

/// Actions shown on a member row for `role`
pub fn row_actions(member: &Member, role: Role) -> Vec<Action> {
    let allowed = allowed_actions(role);
    applicable_actions(member)
        .into_iter()
        .filter(|action| allowed.contains(action))
        .collect()
}

/// Rows for the members table. Without an operator role no row offers actions.
pub fn members_view(slice: &ResourceSlice<Member>, role: Option<Role>) -> MembersView {
    let rows = slice
        .items
        .iter()
        .map(|m| MemberRow {
            id: m.id.clone(),
            registration_number: m.registration_number.clone(),
            name: m.full_name.clone(),
            status: m.status,
            payment_status: m.payment_status,
            actions: role.map(|role| row_actions(m, role)).unwrap_or_default(),
        })
        .collect();
    MembersView {
        state: RenderState::of_list(slice, "No members found"),
        rows,
        busy: slice.action_status.is_loading(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn member(status: &str, payment: &str) -> Member {
        serde_json::from_value(fixtures::member("m1", status, payment)).unwrap()
    }

    #[test]
    fn test_manager_never_sees_admin_only_actions() {
        for (status, payment) in [("PENDING", "PENDING"), ("ACTIVE", "PAID"), ("BLOCKED", "PAID"), ("INACTIVE", "FAILED")] {
            let m = member(status, payment);
            let manager = row_actions(&m, Role::Manager);
            let admin = row_actions(&m, Role::Admin);
            assert!(manager.iter().all(|a| admin.contains(a)));
            assert!(!manager.contains(&Action::Delete));
            assert!(admin.contains(&Action::Delete));
        }
    }

    #[test]
    fn test_actions_follow_status() {
        let active = member("ACTIVE", "PAID");
        assert_eq!(
            row_actions(&active, Role::Admin),
            vec![
                Action::Block,
                Action::Deactivate,
                Action::SendNotice,
                Action::GenerateCertificate,
                Action::Delete
            ]
        );
        assert_eq!(
            row_actions(&active, Role::Manager),
            vec![Action::Deactivate, Action::SendNotice, Action::GenerateCertificate]
        );

        let blocked = member("BLOCKED", "PAID");
        assert_eq!(row_actions(&blocked, Role::Manager), Vec::<Action>::new());
        assert!(!row_actions(&member("ACTIVE", "PENDING"), Role::Admin).contains(&Action::GenerateCertificate));
    }

    #[test]
    fn test_no_role_means_no_actions() {
        let mut slice = ResourceSlice::<Member>::default();
        slice.items = vec![member("PENDING", "PAID"), member("ACTIVE", "PAID")];

        let anonymous = members_view(&slice, None);
        assert_eq!(anonymous.rows.len(), 2);
        assert!(anonymous.rows.iter().all(|row| row.actions.is_empty()));

        let manager = members_view(&slice, Some(Role::Manager));
        assert!(manager.rows.iter().any(|row| !row.actions.is_empty()));
    }
}
