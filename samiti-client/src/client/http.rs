// samiti-client/src/client/http.rs
// HTTP adapter: bearer injection and error normalization

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::FieldErrors;

use crate::session::SessionStore;
use crate::{ClientConfig, ClientError, ClientResult};

/// Error body shapes the backend is known to send
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, alias = "details")]
    errors: Option<FieldErrors>,
}

/// HTTP client trait
///
/// Paths are relative to the API root (`api/members`, `api/members/42`).
/// Every method returns the whole decoded body; envelope handling lives in
/// the thunks.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn get_with_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    /// Raw bytes of a binary artifact (receipt / certificate PDF)
    async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>>;
    /// Session the adapter reads its bearer token from
    fn session(&self) -> &SessionStore;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_root().to_string(),
            session,
        })
    }

    /// Base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_handle(&self) -> Arc<SessionStore> {
        self.session.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request, attaching the bearer token if a session exists
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method.clone(), self.url(path));
        tracing::debug!(%method, path, "api request");
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let response = req.send().await?;
        let bytes = Self::check_status(response).await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Body bytes of a 2xx response, or the normalized error
    async fn check_status(response: reqwest::Response) -> ClientResult<Vec<u8>> {
        let status = response.status();
        let bytes = response.bytes().await?;
        if status.is_success() {
            return Ok(bytes.to_vec());
        }
        let err = normalize_error(status, &bytes);
        tracing::warn!(status = status.as_u16(), error = %err, "api request failed");
        Err(err)
    }
}

/// Map a non-2xx status and its body onto [`ClientError`]
pub(crate) fn normalize_error(status: StatusCode, body: &[u8]) -> ClientError {
    let parsed = serde_json::from_slice::<ErrorBody>(body).ok();
    let fields = parsed
        .as_ref()
        .and_then(|b| b.errors.clone())
        .unwrap_or_default();
    let message = parsed
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() || text.starts_with('<') {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                text
            }
        });

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation { message, fields }
        }
        s if s.is_server_error() => ClientError::Server {
            status: s.as_u16(),
            message,
        },
        s => ClientError::Api {
            status: Some(s.as_u16()),
            message,
            fields,
        },
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::POST, path)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::DELETE, path)).await
    }

    async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        let response = self.request(Method::GET, path).send().await?;
        Self::check_status(response).await
    }

    fn session(&self) -> &SessionStore {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_keeps_fields() {
        let body = br#"{"success":false,"message":"Invalid input","errors":{"mobile":"taken"}}"#;
        match normalize_error(StatusCode::BAD_REQUEST, body) {
            ClientError::Validation { message, fields } => {
                assert_eq!(message, "Invalid input");
                assert_eq!(fields.get("mobile").map(String::as_str), Some("taken"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_field_fallbacks() {
        let err = normalize_error(StatusCode::FORBIDDEN, br#"{"error":"Admins only"}"#);
        assert_eq!(err.message(), "Admins only");

        let err = normalize_error(StatusCode::NOT_FOUND, b"member not found");
        assert_eq!(err.message(), "member not found");

        let err = normalize_error(StatusCode::BAD_GATEWAY, b"<html>nginx</html>");
        assert!(matches!(err, ClientError::Server { status: 502, .. }));
        assert_eq!(err.message(), "Bad Gateway");
    }

    #[test]
    fn test_unknown_status_is_api_error() {
        let err = normalize_error(StatusCode::CONFLICT, br#"{"message":"Already registered"}"#);
        assert!(matches!(err, ClientError::Api { status: Some(409), .. }));
        assert_eq!(err.message(), "Already registered");
    }
}
