//! Receipts (registration fees and member donations)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::ListQuery;
use shared::models::Receipt;

use super::ResourceApi;
use crate::client::HttpClient;
use crate::store::SliceHandle;
use crate::ClientResult;

pub const RECEIPTS_PATH: &str = "api/receipts";
pub const MY_RECEIPTS_PATH: &str = "api/members/me/receipts";

pub struct ReceiptApi<C> {
    inner: ResourceApi<Receipt, C>,
}

impl<C> Clone for ReceiptApi<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: HttpClient> ReceiptApi<C> {
    pub fn new(http: Arc<C>, slice: SliceHandle<Receipt>) -> Self {
        Self {
            inner: ResourceApi::new(http, slice, RECEIPTS_PATH),
        }
    }

    pub fn slice(&self) -> &SliceHandle<Receipt> {
        self.inner.slice()
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list(query).await
    }

    pub async fn my_receipts(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list_from(MY_RECEIPTS_PATH, query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Receipt> {
        self.inner.fetch_by_id(id).await
    }

    /// Save the receipt PDF into `dir`
    pub async fn download(&self, receipt: &Receipt, dir: &Path) -> ClientResult<PathBuf> {
        let path = format!("{}/download", self.inner.item_path(&receipt.id));
        self.inner.download(&path, dir, &receipt.file_name()).await
    }

    /// Admin only
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.inner.delete(id).await
    }
}
