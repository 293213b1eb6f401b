//! Auth API DTOs

use serde::{Deserialize, Serialize};

use crate::permissions::Role;

/// Operator (dashboard user) login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorLoginRequest {
    pub email: String,
    pub password: String,
}

/// Member login; `identifier` is the registration number or mobile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberLoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub principal: Principal,
}

/// Who the bearer token belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    #[serde(rename_all = "camelCase")]
    Operator {
        id: String,
        name: String,
        email: String,
        role: Role,
    },
    #[serde(rename_all = "camelCase")]
    Member {
        id: String,
        registration_number: Option<String>,
        name: String,
    },
}

impl Principal {
    pub fn id(&self) -> &str {
        match self {
            Self::Operator { id, .. } | Self::Member { id, .. } => id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Operator { name, .. } | Self::Member { name, .. } => name,
        }
    }

    /// Operator role; members have none
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Operator { role, .. } => Some(*role),
            Self::Member { .. } => None,
        }
    }
}
