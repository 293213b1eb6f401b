//! Notice Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who receives a notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeRecipient {
    AllActive,
    #[serde(rename_all = "camelCase")]
    Single { member_id: String },
}

/// Broadcast or single-recipient notice. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub content: String,
    pub recipient: NoticeRecipient,
    #[serde(default)]
    pub sent_by: Option<String>,
    pub sent_at: DateTime<Utc>,
}

/// Body of `POST api/notices`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeDraft {
    pub title: String,
    pub subject: String,
    pub content: String,
    pub recipient: NoticeRecipient,
}
