//! Scripted [`HttpClient`] for thunk tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::client::HttpClient;
use crate::client::http::normalize_error;
use crate::session::{Session, SessionStore};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Bytes(Vec<u8>),
    Status(u16, String),
    Delayed(Duration, Box<Reply>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Answers requests from per-route queues; the last reply of a route repeats
#[derive(Debug, Default)]
pub(crate) struct ScriptedClient {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
    session: SessionStore,
}

fn key(method: &str, path: &str) -> String {
    format!("{} {}", method, path)
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        let client = Self::default();
        client.session.save(session).expect("in-memory session");
        client
    }

    pub fn reply(&self, method: &str, path: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(key(method, path))
            .or_default()
            .push_back(reply);
        self
    }

    /// Successful envelope around `data`
    pub fn ok(&self, method: &str, path: &str, data: Value) -> &Self {
        self.reply(method, path, Reply::Json(json!({ "success": true, "data": data })))
    }

    pub fn fail(&self, method: &str, path: &str, status: u16, message: &str) -> &Self {
        self.reply(method, path, Reply::Status(status, message.to_string()))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn next_reply(&self, method: &'static str, path: &str, body: Option<Value>) -> Option<Reply> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(&key(method, path))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    async fn resolve(&self, method: &'static str, path: &str, body: Option<Value>) -> ClientResult<Reply> {
        let mut reply = self
            .next_reply(method, path, body)
            .ok_or_else(|| ClientError::NotFound(format!("no scripted reply for {} {}", method, path)))?;
        while let Reply::Delayed(delay, inner) = reply {
            tokio::time::sleep(delay).await;
            reply = *inner;
        }
        match reply {
            Reply::Status(status, message) => {
                let status = StatusCode::from_u16(status).expect("valid status");
                let body = json!({ "success": false, "message": message }).to_string();
                Err(normalize_error(status, body.as_bytes()))
            }
            other => Ok(other),
        }
    }

    async fn json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        match self.resolve(method, path, body).await? {
            Reply::Json(value) => serde_json::from_value(value)
                .map_err(|e| ClientError::InvalidResponse(e.to_string())),
            other => Err(ClientError::InvalidResponse(format!("expected json, got {:?}", other))),
        }
    }
}

fn to_value<B: Serialize>(body: &B) -> Option<Value> {
    serde_json::to_value(body).ok()
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.json("GET", path, None).await
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        self.json("GET", path, to_value(query)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.json("POST", path, to_value(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.json("POST", path, None).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.json("PUT", path, to_value(body)).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.json("PATCH", path, to_value(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.json("DELETE", path, None).await
    }

    async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        match self.resolve("GET", path, None).await? {
            Reply::Bytes(bytes) => Ok(bytes),
            other => Err(ClientError::InvalidResponse(format!("expected bytes, got {:?}", other))),
        }
    }

    fn session(&self) -> &SessionStore {
        &self.session
    }
}

/// JSON fixtures shaped like backend payloads
pub(crate) mod fixtures {
    use serde_json::{Value, json};

    pub fn member(id: &str, status: &str, payment_status: &str) -> Value {
        json!({
            "id": id,
            "registrationNumber": format!("SM-{}", id),
            "fullName": format!("Member {}", id),
            "email": format!("{}@example.org", id),
            "mobile": "9876543210",
            "address": {
                "line1": "12 Gandhi Road",
                "city": "Pune",
                "district": "Pune",
                "state": "Maharashtra",
                "pinCode": "411001"
            },
            "nominees": [],
            "status": status,
            "paymentStatus": payment_status,
            "createdAt": "2024-01-10T08:00:00Z",
            "updatedAt": "2024-01-10T08:00:00Z"
        })
    }

    pub fn donation(id: &str, amount: u32, status: &str) -> Value {
        json!({ "id": id, "amount": amount, "status": status })
    }

    pub fn receipt(id: &str, amount: u32) -> Value {
        json!({
            "id": id,
            "receiptNumber": format!("R-{}", id),
            "memberId": "m1",
            "amount": amount,
            "kind": "MEMBER_DONATION",
            "issuedAt": "2024-02-01T10:00:00Z"
        })
    }

    pub fn operator_login(role: &str) -> Value {
        json!({
            "token": "token-abc",
            "principal": {
                "kind": "operator",
                "id": "u1",
                "name": "Asha",
                "email": "asha@example.org",
                "role": role
            }
        })
    }
}
