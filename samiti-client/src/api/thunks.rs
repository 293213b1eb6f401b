//! Generic async operations over one slice
//!
//! Each operation marks the slice as loading, calls the HTTP adapter, and
//! resolves or rejects the slice. The error is also returned to the caller.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{ApiResponse, ListQuery};

use super::{into_data, into_page};
use crate::client::HttpClient;
use crate::store::{MutationOutcome, Page, Patch, Resource, SliceAction, SliceHandle};
use crate::{ClientError, ClientResult};

/// Thunks for one entity collection rooted at `base` (e.g. `api/members`)
pub struct ResourceApi<T, C> {
    http: Arc<C>,
    slice: SliceHandle<T>,
    base: &'static str,
}

impl<T, C> Clone for ResourceApi<T, C> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            slice: self.slice.clone(),
            base: self.base,
        }
    }
}

impl<T, C> ResourceApi<T, C>
where
    T: Resource + DeserializeOwned,
    C: HttpClient,
{
    pub fn new(http: Arc<C>, slice: SliceHandle<T>, base: &'static str) -> Self {
        Self { http, slice, base }
    }

    pub fn slice(&self) -> &SliceHandle<T> {
        &self.slice
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn base(&self) -> &'static str {
        self.base
    }

    /// Path of one item
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.base, id)
    }

    /// Fetch the collection; returns the number of items received
    pub async fn fetch_list(&self, query: &ListQuery) -> ClientResult<usize> {
        self.fetch_list_from(self.base, query).await
    }

    /// Fetch a list from another endpoint into this slice (e.g. `api/me/receipts`)
    pub async fn fetch_list_from(&self, path: &str, query: &ListQuery) -> ClientResult<usize> {
        let ticket = self.slice.next_ticket();
        self.slice.dispatch(SliceAction::ListPending { ticket });

        let result = self
            .http
            .get_with_query::<ApiResponse<Vec<T>>, _>(path, query)
            .await
            .and_then(into_page)
            .map(|page| Page {
                items: page.items.into_iter().map(T::narrow).collect(),
                pagination: page.pagination,
            });

        match result {
            Ok(page) => {
                let count = page.items.len();
                tracing::debug!(resource = T::NAME, request_id = ticket, count, total = page.pagination.total, "list fetched");
                self.slice.dispatch(SliceAction::ListFulfilled { ticket, page });
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(resource = T::NAME, request_id = ticket, error = %e, "list fetch failed");
                self.slice.dispatch(SliceAction::ListRejected {
                    ticket,
                    error: e.message(),
                });
                Err(e)
            }
        }
    }

    /// Fetch one item into `selected`. Always hits the backend.
    pub async fn fetch_by_id(&self, id: &str) -> ClientResult<T> {
        let path = self.item_path(id);
        self.fetch_one_from(&path).await
    }

    /// Fetch one item from an arbitrary endpoint into `selected`
    pub async fn fetch_one_from(&self, path: &str) -> ClientResult<T> {
        let ticket = self.slice.next_ticket();
        self.slice.dispatch(SliceAction::DetailPending { ticket });

        let result = self
            .http
            .get::<ApiResponse<T>>(path)
            .await
            .and_then(into_data)
            .map(T::narrow);

        match result {
            Ok(item) => {
                self.slice.dispatch(SliceAction::DetailFulfilled {
                    ticket,
                    item: item.clone(),
                });
                Ok(item)
            }
            Err(e) => {
                tracing::warn!(resource = T::NAME, request_id = ticket, path, error = %e, "detail fetch failed");
                self.slice.dispatch(SliceAction::DetailRejected {
                    ticket,
                    error: e.message(),
                });
                Err(e)
            }
        }
    }

    /// Run a mutation request, tracking it in `action_status`
    pub async fn run_action<R, Fut>(
        &self,
        op: &str,
        request: Fut,
        outcome: impl FnOnce(&R) -> MutationOutcome<T>,
    ) -> ClientResult<R>
    where
        Fut: Future<Output = ClientResult<R>>,
    {
        self.slice.dispatch(SliceAction::ActionPending);
        match request.await {
            Ok(value) => {
                tracing::info!(resource = T::NAME, op, "mutation succeeded");
                self.slice
                    .dispatch(SliceAction::ActionFulfilled(outcome(&value)));
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(resource = T::NAME, op, error = %e, "mutation failed");
                self.slice.dispatch(SliceAction::ActionRejected(e.message()));
                Err(e)
            }
        }
    }

    /// Reject an action before it reaches the network
    pub fn reject_locally(&self, err: ClientError) -> ClientError {
        self.slice.dispatch(SliceAction::ActionRejected(err.message()));
        err
    }

    /// POST a new item; the list is left for the caller to re-fetch
    pub async fn create<B, R>(&self, body: &B) -> ClientResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = async {
            self.http
                .post::<ApiResponse<R>, _>(self.base, body)
                .await
                .and_then(into_data)
        };
        self.run_action("create", request, |_| MutationOutcome::Unchanged)
            .await
    }

    /// PATCH a status sub-resource and apply `patch` to the cached item
    pub async fn patch_status<B>(&self, id: &str, path: &str, body: &B, patch: Patch<T>) -> ClientResult<()>
    where
        B: Serialize + Sync,
    {
        let request = async {
            self.http
                .patch::<ApiResponse<serde_json::Value>, _>(path, body)
                .await?
                .check()?;
            Ok::<_, ClientError>(())
        };
        self.run_action("update-status", request, |_| MutationOutcome::Patched {
            id: id.to_string(),
            patch,
        })
        .await
    }

    /// PUT a full replacement and swap the cached item for the server's copy
    pub async fn replace<B>(&self, id: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + Sync,
    {
        let path = self.item_path(id);
        let request = async {
            self.http
                .put::<ApiResponse<T>, _>(&path, body)
                .await
                .and_then(into_data)
        };
        self.run_action("update", request, |item: &T| {
            MutationOutcome::Replaced(item.clone())
        })
        .await
    }

    /// DELETE an item and drop it from the cached list
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let path = self.item_path(id);
        let request = async {
            self.http
                .delete::<ApiResponse<serde_json::Value>>(&path)
                .await?
                .check()?;
            Ok::<_, ClientError>(())
        };
        self.run_action("delete", request, |_| {
            MutationOutcome::Removed(id.to_string())
        })
        .await
    }

    /// Fetch a binary artifact and save it as `dir/file_name`
    pub async fn download(&self, path: &str, dir: &Path, file_name: &str) -> ClientResult<PathBuf> {
        self.slice.dispatch(SliceAction::DownloadPending);
        let result = async {
            let bytes = self.http.get_bytes(path).await?;
            tokio::fs::create_dir_all(dir).await?;
            let target = dir.join(sanitize_file_name(file_name));
            tokio::fs::write(&target, &bytes).await?;
            Ok::<_, ClientError>((target, bytes.len()))
        }
        .await;

        match result {
            Ok((target, size)) => {
                tracing::info!(resource = T::NAME, path = %target.display(), size, "artifact saved");
                self.slice.dispatch(SliceAction::DownloadFulfilled);
                Ok(target)
            }
            Err(e) => {
                tracing::warn!(resource = T::NAME, error = %e, "download failed");
                self.slice.dispatch(SliceAction::DownloadRejected(e.message()));
                Err(e)
            }
        }
    }
}

/// Keep the suggested name from escaping the download directory
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Status;
    use crate::testing::{Reply, ScriptedClient, fixtures};
    use serde_json::json;
    use shared::models::{Member, MembershipStatus};
    use std::time::Duration;

    fn members_api(client: ScriptedClient) -> ResourceApi<Member, ScriptedClient> {
        ResourceApi::new(Arc::new(client), SliceHandle::new(), "api/members")
    }

    #[tokio::test]
    async fn test_fetch_list_success() {
        let client = ScriptedClient::new();
        client.reply(
            "GET",
            "api/members",
            Reply::Json(json!({
                "success": true,
                "data": [fixtures::member("m1", "ACTIVE", "PAID"), fixtures::member("m2", "PENDING", "PENDING")],
                "pagination": { "page": 1, "limit": 20, "total": 2 }
            })),
        );
        let api = members_api(client);

        let count = api.fetch_list(&ListQuery::all()).await.unwrap();
        let slice = api.slice().snapshot();
        assert_eq!(count, 2);
        assert_eq!(slice.list_status, Status::Succeeded);
        assert_eq!(slice.items.len(), 2);
        assert_eq!(slice.items[0].id, "m1");
        assert_eq!(slice.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_fetch_list_failure_keeps_items() {
        let client = ScriptedClient::new();
        client.ok("GET", "api/members", json!([fixtures::member("m1", "ACTIVE", "PAID")]));
        client.fail("GET", "api/members", 500, "Database unavailable");
        let api = members_api(client);

        api.fetch_list(&ListQuery::all()).await.unwrap();
        let err = api.fetch_list(&ListQuery::all()).await.unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 500, .. }));

        let slice = api.slice().snapshot();
        assert_eq!(slice.list_status, Status::Failed);
        assert_eq!(slice.error.as_deref(), Some("Database unavailable"));
        assert_eq!(slice.items.len(), 1);
        assert_eq!(slice.items[0].id, "m1");
    }

    #[tokio::test]
    async fn test_fetch_list_twice_is_idempotent() {
        let client = ScriptedClient::new();
        client.ok(
            "GET",
            "api/members",
            json!([fixtures::member("m1", "ACTIVE", "PAID"), fixtures::member("m2", "BLOCKED", "PAID")]),
        );
        let api = members_api(client);

        api.fetch_list(&ListQuery::all()).await.unwrap();
        let first = api.slice().snapshot().items;
        api.fetch_list(&ListQuery::all()).await.unwrap();
        let second = api.slice().snapshot().items;
        assert_eq!(first, second);
        assert_eq!(api.http().count("GET", "api/members"), 2);
    }

    #[tokio::test]
    async fn test_query_is_forwarded() {
        let client = ScriptedClient::new();
        client.ok("GET", "api/members", json!([]));
        let api = members_api(client);

        let query = ListQuery::all().paginate(2, 10).with_status("PENDING");
        api.fetch_list(&query).await.unwrap();
        let calls = api.http().calls();
        assert_eq!(calls[0].body, Some(json!({"page": 2, "limit": 10, "status": "PENDING"})));
        assert!(api.slice().snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slower_stale_fetch_does_not_overwrite() {
        let client = ScriptedClient::new();
        client.reply(
            "GET",
            "api/members",
            Reply::Delayed(
                Duration::from_secs(5),
                Box::new(Reply::Json(json!({"data": [fixtures::member("old", "ACTIVE", "PAID")]}))),
            ),
        );
        client.ok("GET", "api/members", json!([fixtures::member("new", "ACTIVE", "PAID")]));
        let api = members_api(client);

        let everything = ListQuery::all();
        let searched = ListQuery::all().with_search("new");
        let slow = api.fetch_list(&everything);
        let fast = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            api.fetch_list(&searched).await
        };
        let (slow, fast) = tokio::join!(slow, fast);
        assert!(slow.is_ok());
        assert!(fast.is_ok());

        let slice = api.slice().snapshot();
        assert_eq!(slice.items.len(), 1);
        assert_eq!(slice.items[0].id, "new");
    }

    #[tokio::test]
    async fn test_fetch_by_id_is_never_cached() {
        let client = ScriptedClient::new();
        client.ok("GET", "api/members/m1", fixtures::member("m1", "PENDING", "PENDING"));
        client.ok("GET", "api/members/m1", fixtures::member("m1", "ACTIVE", "PAID"));
        let api = members_api(client);

        let first = api.fetch_by_id("m1").await.unwrap();
        let second = api.fetch_by_id("m1").await.unwrap();
        assert_eq!(first.status, MembershipStatus::Pending);
        assert_eq!(second.status, MembershipStatus::Active);
        assert_eq!(api.http().count("GET", "api/members/m1"), 2);
        assert_eq!(api.slice().snapshot().selected.map(|m| m.status), Some(MembershipStatus::Active));
    }

    #[tokio::test]
    async fn test_delete_removes_item() {
        let client = ScriptedClient::new();
        client.ok(
            "GET",
            "api/members",
            json!([fixtures::member("m1", "ACTIVE", "PAID"), fixtures::member("m2", "ACTIVE", "PAID")]),
        );
        client.ok("DELETE", "api/members/m1", json!(null));
        let api = members_api(client);

        api.fetch_list(&ListQuery::all()).await.unwrap();
        api.delete("m1").await.unwrap();
        let slice = api.slice().snapshot();
        assert_eq!(slice.action_status, Status::Succeeded);
        assert_eq!(slice.items.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), vec!["m2"]);
    }

    #[tokio::test]
    async fn test_failed_delete_reports_error() {
        let client = ScriptedClient::new();
        client.ok("GET", "api/members", json!([fixtures::member("m1", "ACTIVE", "PAID")]));
        client.fail("DELETE", "api/members/m1", 403, "Only admins can delete members");
        let api = members_api(client);

        api.fetch_list(&ListQuery::all()).await.unwrap();
        let err = api.delete("m1").await.unwrap_err();
        assert!(matches!(err, ClientError::Forbidden(_)));
        let slice = api.slice().snapshot();
        assert_eq!(slice.action_status, Status::Failed);
        assert_eq!(slice.error.as_deref(), Some("Only admins can delete members"));
        assert_eq!(slice.items.len(), 1);
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let client = ScriptedClient::new();
        client.reply("GET", "api/receipts/r1/download", Reply::Bytes(b"%PDF-1.4".to_vec()));
        let api = members_api(client);

        let path = api
            .download("api/receipts/r1/download", dir.path(), "../receipt-R-1.pdf")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("_receipt-R-1.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        assert_eq!(api.slice().snapshot().download_status, Status::Succeeded);
        assert_eq!(api.slice().snapshot().action_status, Status::Idle);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("receipt-1.pdf"), "receipt-1.pdf");
        assert_eq!(sanitize_file_name("a/b\\c.pdf"), "a_b_c.pdf");
        assert_eq!(sanitize_file_name("..."), "download");
    }
}
