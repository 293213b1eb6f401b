//! Login, logout and the current principal

use std::sync::Arc;

use shared::ApiResponse;
use shared::auth::{LoginResponse, MemberLoginRequest, OperatorLoginRequest};

use super::into_data;
use crate::client::HttpClient;
use crate::session::Session;
use crate::store::Store;
use crate::{ClientError, ClientResult};

pub const OPERATOR_LOGIN_PATH: &str = "api/admin/login";
pub const MEMBER_LOGIN_PATH: &str = "api/members/login";

pub struct AuthApi<C> {
    http: Arc<C>,
    store: Store,
}

impl<C> Clone for AuthApi<C> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            store: self.store.clone(),
        }
    }
}

impl<C: HttpClient> AuthApi<C> {
    pub fn new(http: Arc<C>, store: Store) -> Self {
        Self { http, store }
    }

    /// Back-office login by email
    pub async fn login_operator(&self, email: &str, password: &str) -> ClientResult<Session> {
        let email = email.trim();
        require_credentials("email", email, password)?;
        let request = OperatorLoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.login(OPERATOR_LOGIN_PATH, &request).await
    }

    /// Member login by registration number, email or mobile
    pub async fn login_member(&self, identifier: &str, password: &str) -> ClientResult<Session> {
        let identifier = identifier.trim();
        require_credentials("identifier", identifier, password)?;
        let request = MemberLoginRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        };
        self.login(MEMBER_LOGIN_PATH, &request).await
    }

    async fn login<B: serde::Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<Session> {
        let response: LoginResponse = self
            .http
            .post::<ApiResponse<LoginResponse>, _>(path, body)
            .await
            .and_then(into_data)?;

        let session = Session::from(response);
        // a new identity must not see the previous one's cache
        self.store.reset();
        self.http.session().save(session.clone())?;
        tracing::info!(
            user = %session.principal.name(),
            role = ?session.role(),
            "Logged in"
        );
        Ok(session)
    }

    /// Forget the session and every cached collection
    pub fn logout(&self) -> ClientResult<()> {
        let who = self.whoami().map(|s| s.principal.name().to_string());
        self.http.session().clear()?;
        self.store.reset();
        tracing::info!(user = ?who, "Logged out");
        Ok(())
    }

    /// Current session, if any
    pub fn whoami(&self) -> Option<Session> {
        self.http.session().current()
    }
}

fn require_credentials(field: &str, identity: &str, password: &str) -> ClientResult<()> {
    let mut fields = shared::FieldErrors::new();
    if identity.is_empty() {
        fields.insert(field.to_string(), format!("{} is required", capitalize(field)));
    }
    if password.is_empty() {
        fields.insert("password".to_string(), "Password is required".to_string());
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ClientError::invalid_fields(fields))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
