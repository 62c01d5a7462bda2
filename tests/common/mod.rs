// Shared harness for router tests: in-memory stores behind the same traits
// the PostgreSQL and Redis implementations use.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use zeroize::Zeroizing;

use paket_tracker::{
    config::Config,
    error::{AppError, Result},
    models::{
        account::Account,
        shipment::{NewShipment, Shipment, ShipmentChanges, ShipmentStatus},
    },
    repositories::{
        account::AccountRepository, session::SessionCache, shipment::ShipmentRepository,
    },
    routes::create_router,
    state::AppState,
};

pub const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789";

#[derive(Default)]
pub struct MemoryAccounts {
    rows: Mutex<Vec<Account>>,
    next_id: AtomicI64,
}

impl MemoryAccounts {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn find(&self, username: &str) -> Option<Account> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.username == username)
            .cloned()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccounts {
    async fn insert_if_absent(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<Account>> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|a| a.username == username || a.email == email) {
            return Ok(None);
        }

        let account = Account {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: username.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            created_at: Utc::now(),
        };
        rows.push(account.clone());
        Ok(Some(account))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        Ok(self.find(username))
    }
}

#[derive(Default)]
pub struct MemoryShipments {
    rows: Mutex<Vec<Shipment>>,
    next_id: AtomicI64,
}

impl MemoryShipments {
    pub fn get(&self, id: i64) -> Option<Shipment> {
        self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ShipmentRepository for MemoryShipments {
    async fn list_by_account(&self, account_id: i64) -> Result<Vec<Shipment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, account_id: i64, shipment: NewShipment) -> Result<Shipment> {
        let shipment = Shipment {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            sender_name: shipment.sender_name,
            receiver_name: shipment.receiver_name,
            address: shipment.address,
            date: shipment.date,
            arrival_date: None,
            content: shipment.content,
            status: ShipmentStatus::Dikirim,
            account_id,
        };
        self.rows.lock().unwrap().push(shipment.clone());
        Ok(shipment)
    }

    async fn find_owned(&self, id: i64, account_id: i64) -> Result<Option<Shipment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id && s.account_id == account_id)
            .cloned())
    }

    async fn update_owned(&self, id: i64, account_id: i64, changes: ShipmentChanges) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows
            .iter_mut()
            .find(|s| s.id == id && s.account_id == account_id)
        else {
            return Ok(0);
        };

        if let Some(v) = changes.sender_name {
            row.sender_name = v;
        }
        if let Some(v) = changes.receiver_name {
            row.receiver_name = v;
        }
        if let Some(v) = changes.address {
            row.address = v;
        }
        if let Some(v) = changes.date {
            row.date = v;
        }
        if let Some(v) = changes.content {
            row.content = v;
        }
        Ok(1)
    }

    async fn mark_done(
        &self,
        id: i64,
        account_id: i64,
        arrived_at: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|s| s.id == id && s.account_id == account_id)
            .map(|row| {
                row.status = ShipmentStatus::Selesai;
                row.arrival_date = Some(arrived_at);
                arrived_at
            }))
    }

    async fn delete_owned(&self, id: i64, account_id: i64) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| !(s.id == id && s.account_id == account_id));
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemorySessions {
    tokens: Mutex<HashMap<i64, (String, u64)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

fn cache_unavailable() -> AppError {
    AppError::Redis(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "cache unavailable",
    )))
}

impl MemorySessions {
    pub fn cached(&self, account_id: i64) -> Option<(String, u64)> {
        self.tokens.lock().unwrap().get(&account_id).cloned()
    }

    pub fn put(&self, account_id: i64, token: &str) {
        self.tokens
            .lock()
            .unwrap()
            .insert(account_id, (token.to_string(), 3600));
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionCache for MemorySessions {
    async fn get_token(&self, account_id: i64) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(cache_unavailable());
        }
        Ok(self.cached(account_id).map(|(token, _)| token))
    }

    async fn store_token(&self, account_id: i64, token: &str, ttl_secs: u64) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(cache_unavailable());
        }
        self.tokens
            .lock()
            .unwrap()
            .insert(account_id, (token.to_string(), ttl_secs));
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused@localhost/unused".to_string(),
        redis_url: "redis://127.0.0.1:6379".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        jwt_secret: Zeroizing::new(TEST_SECRET.to_vec()),
        token_ttl_hours: 72,
        session_cache_ttl_hours: 24,
        db_pool_max_size: 1,
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub accounts: Arc<MemoryAccounts>,
    pub shipments: Arc<MemoryShipments>,
    pub sessions: Arc<MemorySessions>,
}

impl TestApp {
    pub fn new() -> Self {
        let accounts = Arc::new(MemoryAccounts::default());
        let shipments = Arc::new(MemoryShipments::default());
        let sessions = Arc::new(MemorySessions::default());

        let state = AppState::from_parts(
            &test_config(),
            accounts.clone(),
            shipments.clone(),
            sessions.clone(),
        );

        Self {
            router: create_router(state.clone()),
            state,
            accounts,
            shipments,
            sessions,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Registers an account and returns its token.
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "password": "secret1",
                    "email": format!("{}@example.com", username),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a shipment and returns its JSON representation.
    pub async fn create_shipment(&self, token: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/paket",
                Some(token),
                Some(serde_json::json!({
                    "sender": "Budi",
                    "receiver": "Siti",
                    "address": "Jl. Merdeka 1, Jakarta",
                    "date": "2024-05-01",
                    "content": "Books",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
        body["data"].clone()
    }
}
