//! Member Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Membership lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Pending,
    Active,
    Blocked,
    Inactive,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Blocked => "BLOCKED",
            Self::Inactive => "INACTIVE",
        }
    }
}

/// Registration fee status; independent of [`MembershipStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeStatus {
    Pending,
    Paid,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pin_code: String,
}

/// Employment sub-record; ties the member to a contribution plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employment {
    pub employer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_group_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nominee {
    pub name: String,
    pub relation: String,
    /// Share in percent; all nominees of a member sum to 100
    pub share: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

/// Who blocked a member, when, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<String>,
    pub blocked_at: DateTime<Utc>,
}

/// Member entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub registration_number: Option<String>,
    pub full_name: String,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub email: String,
    pub mobile: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub employment: Option<Employment>,
    #[serde(default)]
    pub nominees: Vec<Nominee>,
    pub status: MembershipStatus,
    pub payment_status: FeeStatus,
    #[serde(default)]
    pub blocking: Option<BlockInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Certificates are issued only to verified members whose fee is paid
    pub fn is_certificate_eligible(&self) -> bool {
        self.status == MembershipStatus::Active && self.payment_status == FeeStatus::Paid
    }
}

/// Admin lifecycle operation on a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MemberStatusChange {
    /// Pending -> Active
    Verify,
    /// Pending -> Inactive
    Reject { reason: String },
    /// Active -> Blocked
    Block { reason: String },
    /// Blocked -> Active
    Unblock,
    /// Active -> Inactive
    Deactivate,
    /// Inactive -> Active
    Reactivate,
}

impl MemberStatusChange {
    /// Status the member ends up in
    pub fn target(&self) -> MembershipStatus {
        match self {
            Self::Verify | Self::Unblock | Self::Reactivate => MembershipStatus::Active,
            Self::Block { .. } => MembershipStatus::Blocked,
            Self::Reject { .. } | Self::Deactivate => MembershipStatus::Inactive,
        }
    }

    /// Whether this change is legal from `from`
    pub fn applies_to(&self, from: MembershipStatus) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, from),
            (Self::Verify, Pending)
                | (Self::Reject { .. }, Pending)
                | (Self::Block { .. }, Active)
                | (Self::Unblock, Blocked)
                | (Self::Deactivate, Active)
                | (Self::Reactivate, Inactive)
        )
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Reject { reason } | Self::Block { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Reject { .. } => "reject",
            Self::Block { .. } => "block",
            Self::Unblock => "unblock",
            Self::Deactivate => "deactivate",
            Self::Reactivate => "reactivate",
        }
    }
}

/// Body of `PATCH api/members/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStatusUpdate {
    pub status: MembershipStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&MemberStatusChange> for MemberStatusUpdate {
    fn from(change: &MemberStatusChange) -> Self {
        Self {
            status: change.target(),
            reason: change.reason().map(str::to_string),
        }
    }
}
