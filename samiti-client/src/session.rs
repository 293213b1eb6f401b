//! Persisted login session
//!
//! One record (principal + bearer token) kept in memory and mirrored to a
//! JSON file, so a restarted client stays logged in. The HTTP adapter reads
//! the token from here before every request.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::Role;
use shared::auth::{LoginResponse, Principal};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Logged-in identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub principal: Principal,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, principal: Principal) -> Self {
        Self {
            token: token.into(),
            principal,
            logged_in_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.principal.role()
    }

    /// Expiry from the token's `exp` claim, when the token is a JWT
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
        let exp = claims.get("exp")?.as_i64()?;
        DateTime::from_timestamp(exp, 0)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at().is_some_and(|exp| exp <= Utc::now())
    }
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self::new(resp.token, resp.principal)
    }
}

/// Session holder shared by the HTTP adapter and the auth thunks
#[derive(Debug, Default)]
pub struct SessionStore {
    /// `None` keeps the session in memory only
    path: Option<PathBuf>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Session that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the session persisted at `path`.
    ///
    /// A missing, unreadable, or expired file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = match read_session(&path) {
            Ok(Some(session)) if session.is_expired() => {
                tracing::info!(user = %session.principal.name(), "Persisted session expired, discarding");
                let _ = std::fs::remove_file(&path);
                None
            }
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
                None
            }
        };
        Self {
            path: Some(path),
            current: RwLock::new(session),
        }
    }

    /// Bearer token of the current session
    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.token.clone()))
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().ok().and_then(|s| s.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.current().and_then(|s| s.role())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Replace the session and persist it
    pub fn save(&self, session: Session) -> Result<(), SessionError> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serde_json::to_string_pretty(&session)?)?;
            tracing::debug!(path = %path.display(), "Session saved");
        }
        if let Ok(mut current) = self.current.write() {
            *current = Some(session);
        }
        Ok(())
    }

    /// Forget the session (logout)
    pub fn clear(&self) -> Result<(), SessionError> {
        if let Ok(mut current) = self.current.write() {
            *current = None;
        }
        if let Some(path) = &self.path {
            if path.exists() {
                std::fs::remove_file(path)?;
                tracing::debug!("Session cleared");
            }
        }
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn read_session(path: &Path) -> Result<Option<Session>, SessionError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}
