//! Back-office operators

use std::sync::Arc;

use shared::models::{Operator, OperatorCreate};
use shared::permissions::can;
use shared::{Action, FieldErrors, ListQuery};

use super::ResourceApi;
use crate::client::HttpClient;
use crate::store::SliceHandle;
use crate::{ClientError, ClientResult};

pub const OPERATORS_PATH: &str = "api/admin/users";

const MIN_PASSWORD_LEN: usize = 8;

pub struct OperatorApi<C> {
    inner: ResourceApi<Operator, C>,
}

impl<C> Clone for OperatorApi<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: HttpClient> OperatorApi<C> {
    pub fn new(http: Arc<C>, slice: SliceHandle<Operator>) -> Self {
        Self {
            inner: ResourceApi::new(http, slice, OPERATORS_PATH),
        }
    }

    pub fn slice(&self) -> &SliceHandle<Operator> {
        self.inner.slice()
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list(query).await
    }

    /// Create an operator. Only admins get past the local gate.
    pub async fn create(&self, payload: OperatorCreate) -> ClientResult<Operator> {
        let role = self.inner.http().session().role();
        if !role.is_some_and(|r| can(r, Action::CreateOperator)) {
            return Err(self.inner.reject_locally(ClientError::Forbidden(
                "Only admins can create operators".to_string(),
            )));
        }
        let payload = validate_operator(payload).map_err(|e| self.inner.reject_locally(e))?;
        tracing::info!(email = %payload.email, role = ?payload.role, "Creating operator");
        self.inner.create(&payload).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.inner.delete(id).await
    }
}

fn validate_operator(mut payload: OperatorCreate) -> ClientResult<OperatorCreate> {
    payload.name = payload.name.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    let mut fields = FieldErrors::new();
    if payload.name.is_empty() {
        fields.insert("name".into(), "Name is required".into());
    }
    if !super::registration::is_email(&payload.email) {
        fields.insert("email".into(), "Enter a valid email address".into());
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        fields.insert(
            "password".into(),
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }

    if fields.is_empty() {
        Ok(payload)
    } else {
        Err(ClientError::invalid_fields(fields))
    }
}
