//! Notices (write-once)

use std::sync::Arc;

use shared::models::{Notice, NoticeDraft, NoticeRecipient};
use shared::{FieldErrors, ListQuery};

use super::ResourceApi;
use crate::client::HttpClient;
use crate::store::SliceHandle;
use crate::{ClientError, ClientResult};

pub const NOTICES_PATH: &str = "api/notices";
pub const MY_NOTICES_PATH: &str = "api/members/me/notices";

pub struct NoticeApi<C> {
    inner: ResourceApi<Notice, C>,
}

impl<C> Clone for NoticeApi<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: HttpClient> NoticeApi<C> {
    pub fn new(http: Arc<C>, slice: SliceHandle<Notice>) -> Self {
        Self {
            inner: ResourceApi::new(http, slice, NOTICES_PATH),
        }
    }

    pub fn slice(&self) -> &SliceHandle<Notice> {
        self.inner.slice()
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list(query).await
    }

    pub async fn my_notices(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list_from(MY_NOTICES_PATH, query).await
    }

    /// Send a notice; the list is re-fetched by the caller
    pub async fn send(&self, draft: NoticeDraft) -> ClientResult<Notice> {
        let draft = validate_draft(draft).map_err(|e| self.inner.reject_locally(e))?;
        let scope = match &draft.recipient {
            NoticeRecipient::AllActive => "all-active",
            NoticeRecipient::Single { .. } => "single",
        };
        tracing::info!(scope, title = %draft.title, "Sending notice");
        self.inner.create(&draft).await
    }
}

fn validate_draft(mut draft: NoticeDraft) -> ClientResult<NoticeDraft> {
    draft.title = draft.title.trim().to_string();
    draft.subject = draft.subject.trim().to_string();

    let mut fields = FieldErrors::new();
    if draft.title.is_empty() {
        fields.insert("title".into(), "Title is required".into());
    }
    if draft.subject.is_empty() {
        fields.insert("subject".into(), "Subject is required".into());
    }
    if draft.content.trim().is_empty() {
        fields.insert("content".into(), "Content is required".into());
    }
    if let NoticeRecipient::Single { member_id } = &draft.recipient {
        if member_id.trim().is_empty() {
            fields.insert("memberId".into(), "Choose a member".into());
        }
    }

    if fields.is_empty() {
        Ok(draft)
    } else {
        Err(ClientError::invalid_fields(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use serde_json::json;

    fn draft(recipient: NoticeRecipient) -> NoticeDraft {
        NoticeDraft {
            title: " AGM ".into(),
            subject: "Annual general meeting".into(),
            content: "The AGM is on Sunday at 10am.".into(),
            recipient,
        }
    }

    fn notice() -> serde_json::Value {
        json!({
            "id": "n1",
            "title": "AGM",
            "subject": "Annual general meeting",
            "content": "The AGM is on Sunday at 10am.",
            "recipient": {"scope": "ALL_ACTIVE"},
            "sentAt": "2024-04-01T06:30:00Z"
        })
    }

    #[tokio::test]
    async fn test_send_to_single_member() {
        let client = ScriptedClient::new();
        client.ok("POST", NOTICES_PATH, notice());
        let api = NoticeApi::new(Arc::new(client), SliceHandle::new());

        api.send(draft(NoticeRecipient::Single { member_id: "m4".into() }))
            .await
            .unwrap();
        let body = api.inner.http().calls()[0].body.clone().unwrap();
        assert_eq!(body["title"], "AGM");
        assert_eq!(body["recipient"], json!({"scope": "SINGLE", "memberId": "m4"}));
    }

    #[tokio::test]
    async fn test_incomplete_draft_is_rejected() {
        let api = NoticeApi::new(Arc::new(ScriptedClient::new()), SliceHandle::new());
        let mut bad = draft(NoticeRecipient::Single { member_id: " ".into() });
        bad.content = String::new();

        let err = api.send(bad).await.unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(err.message(), "2 fields need attention");
        assert!(api.inner.http().calls().is_empty());
    }

    #[tokio::test]
    async fn test_my_notices() {
        let client = ScriptedClient::new();
        client.ok("GET", MY_NOTICES_PATH, json!([notice()]));
        let api = NoticeApi::new(Arc::new(client), SliceHandle::new());

        api.my_notices(&ListQuery::all()).await.unwrap();
        assert_eq!(api.slice().snapshot().items[0].recipient, NoticeRecipient::AllActive);
    }
}
