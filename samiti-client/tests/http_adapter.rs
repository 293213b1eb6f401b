//! Network adapter against an in-process axum server

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use samiti_client::api::members::MEMBERS_PATH;
use samiti_client::session::{Session, SessionStore};
use samiti_client::store::Status;
use samiti_client::view::donations::donations_view;
use samiti_client::{ClientConfig, ClientError, HttpClient, ListQuery, NetworkHttpClient, SamitiApi, Store};
use serde_json::{Value, json};
use shared::auth::Principal;
use shared::Role;

async fn whoami(headers: HeaderMap) -> impl IntoResponse {
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(auth) => (StatusCode::OK, Json(json!({"success": true, "data": auth}))),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Please log in"})),
        ),
    }
}

async fn members(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": [{
            "id": "m1",
            "fullName": "Ravi Kulkarni",
            "email": "ravi@example.org",
            "mobile": "9876543210",
            "address": {"line1": "12 Gandhi Road", "city": "Pune", "district": "Pune", "state": "Maharashtra", "pinCode": "411001"},
            "status": "ACTIVE",
            "paymentStatus": "PAID",
            "createdAt": "2024-01-10T08:00:00Z",
            "updatedAt": "2024-01-10T08:00:00Z"
        }],
        "pagination": {"page": 1, "limit": 20, "total": 41},
        "echo": query
    }))
}

async fn member_status(Path(id): Path<String>) -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "message": format!("Member {} cannot be blocked", id),
            "errors": {"reason": "Reason is too short"}
        })),
    )
}

async fn donations() -> Json<Value> {
    Json(json!({"success": true, "data": [{"id": "d1", "amount": 500, "status": "SUCCESS"}]}))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html><body>Internal Server Error</body></html>")
}

async fn malformed() -> impl IntoResponse {
    (StatusCode::OK, "{not json")
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/api/whoami", get(whoami))
        .route("/api/members", get(members))
        .route("/api/members/{id}/status", patch(member_status))
        .route("/api/donations", get(donations))
        .route("/api/broken", get(broken))
        .route("/api/malformed", get(malformed));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

fn operator_session() -> Session {
    Session::new(
        "token-xyz",
        Principal::Operator {
            id: "u1".into(),
            name: "Asha".into(),
            email: "asha@example.org".into(),
            role: Role::Admin,
        },
    )
}

async fn client(session: Option<Session>) -> Arc<NetworkHttpClient> {
    let base = spawn_server().await;
    let store = Arc::new(SessionStore::in_memory());
    if let Some(session) = session {
        store.save(session).unwrap();
    }
    Arc::new(NetworkHttpClient::new(&ClientConfig::new(base).with_timeout(5), store).unwrap())
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let http = client(Some(operator_session())).await;
    let body: Value = http.get("api/whoami").await.unwrap();
    assert_eq!(body["data"], "Bearer token-xyz");
}

#[tokio::test]
async fn test_missing_session_is_unauthorized() {
    let http = client(None).await;
    let err = http.get::<Value>("api/whoami").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Please log in");
}

#[tokio::test]
async fn test_list_envelope_fills_slice() {
    let http = client(Some(operator_session())).await;
    let api = SamitiApi::new(http, Store::new());

    let count = api
        .members
        .list(&ListQuery::all().paginate(1, 20).with_status("ACTIVE"))
        .await
        .unwrap();
    assert_eq!(count, 1);
    let slice = api.store.members.snapshot();
    assert_eq!(slice.list_status, Status::Succeeded);
    assert_eq!(slice.pagination.total, 41);
    assert_eq!(slice.items[0].full_name, "Ravi Kulkarni");
    assert_eq!(MEMBERS_PATH, "api/members");
}

#[tokio::test]
async fn test_query_reaches_server() {
    let http = client(None).await;
    let body: Value = http
        .get_with_query("api/members", &ListQuery::all().paginate(3, 10).with_search("ravi"))
        .await
        .unwrap();
    assert_eq!(body["echo"], json!({"page": "3", "limit": "10", "search": "ravi"}));
}

#[tokio::test]
async fn test_bad_request_carries_field_errors() {
    let http = client(Some(operator_session())).await;
    let api = SamitiApi::new(http, Store::new());

    let err = api.members.block("m1", "x").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
    assert_eq!(err.message(), "Member m1 cannot be blocked");
    assert_eq!(
        err.field_errors().and_then(|f| f.get("reason")).map(String::as_str),
        Some("Reason is too short")
    );
    let slice = api.store.members.snapshot();
    assert_eq!(slice.action_status, Status::Failed);
    assert_eq!(slice.error.as_deref(), Some("Member m1 cannot be blocked"));
}

#[tokio::test]
async fn test_server_error_with_html_body() {
    let http = client(None).await;
    let err = http.get::<Value>("api/broken").await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 500, .. }));
    assert!(err.is_transient());
    assert_eq!(err.message(), "Internal Server Error");
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let http = client(None).await;
    let err = http.get::<Value>("api/malformed").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
    assert_eq!(err.message(), "Unexpected response from the server");
}

#[tokio::test]
async fn test_unreachable_server_is_transient() {
    let store = Arc::new(SessionStore::in_memory());
    let http = NetworkHttpClient::new(&ClientConfig::new("http://127.0.0.1:1").with_timeout(2), store).unwrap();
    let err = http.get::<Value>("api/members").await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_donations_scenario() {
    let http = client(None).await;
    let api = SamitiApi::new(http, Store::new());

    api.donations.list(&ListQuery::all()).await.unwrap();
    let view = donations_view(&api.store.donations.snapshot());
    assert_eq!(view.total, rust_decimal::Decimal::from(500));
    assert_eq!(view.rows.len(), 1);
    assert!(view.rows[0].download_enabled);
}
