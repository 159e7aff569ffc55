#![allow(dead_code)]

use jsonwebtoken::{EncodingKey, Header, encode};
use portal_client::api::{ApiClient, ReqwestTransport};
use portal_client::session::{MemorySessionStore, Session, SessionStore};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_USER_ID: u64 = 42;
pub const TEST_EMAIL: &str = "ana@example.com";
pub const TEST_REFRESH: &str = "refresh-1";

pub struct TestPortal {
    pub server: MockServer,
    pub client: ApiClient,
    pub session: Arc<MemorySessionStore>,
}

impl TestPortal {
    pub async fn spawn() -> Self {
        Self::spawn_with(Session::default()).await
    }

    /// Client with an access token (`token`) and the standard refresh token.
    pub async fn signed_in(token: &str) -> Self {
        Self::spawn_with(Session {
            access_token: Some(token.to_string()),
            refresh_token: Some(TEST_REFRESH.to_string()),
            ..Default::default()
        })
        .await
    }

    pub async fn spawn_with(session: Session) -> Self {
        let server = MockServer::start().await;
        let transport = ReqwestTransport::new(server.uri(), Duration::from_secs(5))
            .expect("Failed to build transport");
        let session = Arc::new(MemorySessionStore::with_session(session));
        let client = ApiClient::new(Arc::new(transport), session.clone());

        Self {
            server,
            client,
            session,
        }
    }

    pub fn state(&self) -> Session {
        self.session.state()
    }

    /// Number of requests the backend saw on `path`.
    pub async fn hits(&self, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }
}

/// HS256 access token with SimpleJWT-style claims.
pub fn mint_access_token(user_id: u64, email: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "token_type": "access",
        "user_id": user_id,
        "email": email,
        "first_name": "Ana",
        "last_name": "García",
        "username": "ana",
        "role": "ADMIN",
        "iat": now,
        "exp": now + 300,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-signing-secret"),
    )
    .expect("Failed to mint token")
}

pub fn success(data: Value) -> Value {
    json!({ "ok": true, "data": data, "meta": { "status": 200, "request_id": "req-ok" } })
}

pub fn failure(code: &str, message: &str, status: u16) -> Value {
    json!({
        "ok": false,
        "error": { "code": code, "message": message },
        "meta": { "status": status, "request_id": format!("req-{}", code) }
    })
}

pub fn page(results: Vec<Value>) -> Value {
    let count = results.len();
    json!({ "results": results, "count": count, "next": null, "previous": null, "page": 1, "page_size": 20 })
}

pub fn payment_json(id: &str, amount: &str, recorded_at: &str) -> Value {
    json!({
        "id": id,
        "consorcio_id": "c1",
        "payer_user": "u1",
        "amount": amount,
        "currency": "ARS",
        "period": "2026-10",
        "concept": "Expensas octubre",
        "method": "TRANSFER",
        "note": null,
        "recorded_by": "admin",
        "recorded_at": recorded_at,
        "unit": "3B"
    })
}

pub fn consorcio_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "default_conversation_id": null,
        "created_at": "2026-01-10T09:00:00Z"
    })
}

pub fn ticket_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "consorcio_id": "c1",
        "created_by": "u1",
        "title": "Filtración en cochera",
        "description": "Gotea desde el techo",
        "status": status,
        "priority": "HIGH",
        "assigned_to": null,
        "created_at": "2026-10-02T10:00:00Z",
        "updated_at": "2026-10-02T10:00:00Z"
    })
}
