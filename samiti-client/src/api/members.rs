//! Member moderation and profile

use std::sync::Arc;

use chrono::Utc;
use shared::ListQuery;
use shared::models::{BlockInfo, Member, MemberStatusChange, MemberStatusUpdate, MembershipStatus};

use super::ResourceApi;
use crate::client::HttpClient;
use crate::store::SliceHandle;
use crate::{ClientError, ClientResult};

pub const MEMBERS_PATH: &str = "api/members";
pub const MY_PROFILE_PATH: &str = "api/members/me";

pub struct MemberApi<C> {
    inner: ResourceApi<Member, C>,
}

impl<C> Clone for MemberApi<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: HttpClient> MemberApi<C> {
    pub fn new(http: Arc<C>, slice: SliceHandle<Member>) -> Self {
        Self {
            inner: ResourceApi::new(http, slice, MEMBERS_PATH),
        }
    }

    pub fn slice(&self) -> &SliceHandle<Member> {
        self.inner.slice()
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list(query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Member> {
        self.inner.fetch_by_id(id).await
    }

    /// Profile of the logged-in member
    pub async fn my_profile(&self) -> ClientResult<Member> {
        self.inner.fetch_one_from(MY_PROFILE_PATH).await
    }

    /// Move a member along its lifecycle.
    ///
    /// A change that is illegal for the cached status is rejected without a
    /// request; members not in the cache are left to the backend to judge.
    pub async fn change_status(&self, id: &str, change: MemberStatusChange) -> ClientResult<()> {
        if change.reason().is_some_and(|r| r.trim().is_empty()) {
            return Err(self
                .inner
                .reject_locally(ClientError::field("reason", "A reason is required")));
        }
        if let Some(current) = self.cached_status(id) {
            if !change.applies_to(current) {
                return Err(self.inner.reject_locally(ClientError::InvalidState(format!(
                    "Cannot {} a member that is {}",
                    change.name(),
                    current.as_str().to_lowercase()
                ))));
            }
        }

        let blocked_by = self
            .inner
            .http()
            .session()
            .current()
            .map(|s| s.principal.name().to_string());
        let body = MemberStatusUpdate::from(&change);
        let path = format!("{}/status", self.inner.item_path(id));
        tracing::info!(member_id = %id, action = change.name(), "Changing member status");

        let patch = Arc::new(move |member: &mut Member| {
            member.status = change.target();
            member.updated_at = Utc::now();
            match &change {
                MemberStatusChange::Block { reason } => {
                    member.blocking = Some(BlockInfo {
                        reason: reason.clone(),
                        blocked_by: blocked_by.clone(),
                        blocked_at: Utc::now(),
                    });
                }
                MemberStatusChange::Unblock => member.blocking = None,
                _ => {}
            }
        });
        self.inner.patch_status(id, &path, &body, patch).await
    }

    pub async fn verify(&self, id: &str) -> ClientResult<()> {
        self.change_status(id, MemberStatusChange::Verify).await
    }

    pub async fn reject(&self, id: &str, reason: impl Into<String>) -> ClientResult<()> {
        self.change_status(id, MemberStatusChange::Reject { reason: reason.into() })
            .await
    }

    pub async fn block(&self, id: &str, reason: impl Into<String>) -> ClientResult<()> {
        self.change_status(id, MemberStatusChange::Block { reason: reason.into() })
            .await
    }

    pub async fn unblock(&self, id: &str) -> ClientResult<()> {
        self.change_status(id, MemberStatusChange::Unblock).await
    }

    pub async fn deactivate(&self, id: &str) -> ClientResult<()> {
        self.change_status(id, MemberStatusChange::Deactivate).await
    }

    pub async fn reactivate(&self, id: &str) -> ClientResult<()> {
        self.change_status(id, MemberStatusChange::Reactivate).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.inner.delete(id).await
    }

    fn cached_status(&self, id: &str) -> Option<MembershipStatus> {
        self.slice().with(|slice| {
            slice
                .find(id)
                .or(slice.selected.as_ref().filter(|m| m.id == id))
                .map(|m| m.status)
        })
    }
}
