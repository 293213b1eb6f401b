//! Operator (dashboard user) Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::Role;

/// Dashboard operator; distinct from [`super::Member`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create operator payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorCreate {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}
