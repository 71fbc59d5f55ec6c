#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use perks_api::config::{LogFormat, ServerConfig};
use perks_api::router::build_app_router;
use perks_api::state::AppState;
use perks_core::types::DbId;
use perks_db::models::perk::{NewPerk, Perk, PerkChanges};
use perks_db::repositories::{PerkStore, StoreError};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "postgres://unused/test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 1,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router over the given store, with the same
/// middleware stack production uses.
pub fn build_test_app(store: Arc<dyn PerkStore>) -> Router {
    let config = test_config();
    let state = AppState {
        perks: store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory [`PerkStore`] that mirrors the Postgres store's observable
/// behaviour: sequential ids, newest-first ordering, exact title matching and
/// `(title, merchant)` uniqueness. Counts every call so tests can assert the
/// store was never reached.
#[derive(Default)]
pub struct InMemoryPerkStore {
    rows: Mutex<Vec<Perk>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
}

impl InMemoryPerkStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of store calls made so far (excluding `ping`).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn newest_first(mut rows: Vec<Perk>) -> Vec<Perk> {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }

    fn is_duplicate(
        rows: &[Perk],
        skip_id: Option<DbId>,
        title: &str,
        merchant: &Option<String>,
    ) -> bool {
        rows.iter()
            .any(|r| Some(r.id) != skip_id && r.title == title && &r.merchant == merchant)
    }

    fn duplicate() -> StoreError {
        StoreError::Duplicate {
            constraint: "uq_perks_title_merchant".to_string(),
        }
    }
}

#[async_trait]
impl PerkStore for InMemoryPerkStore {
    async fn insert(&self, perk: &NewPerk) -> Result<Perk, StoreError> {
        self.record_call();
        let mut rows = self.rows.lock().unwrap();
        if Self::is_duplicate(&rows, None, &perk.title, &perk.merchant) {
            return Err(Self::duplicate());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as DbId + 1;
        // Each insert is one second later than the previous one.
        let created_at =
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(id);
        let row = Perk {
            id,
            title: perk.title.clone(),
            description: perk.description.clone(),
            category: perk.category,
            discount_percent: perk.discount_percent,
            merchant: perk.merchant.clone(),
            created_at,
            updated_at: created_at,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Perk>, StoreError> {
        self.record_call();
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Vec<Perk>, StoreError> {
        self.record_call();
        let rows = self.rows.lock().unwrap();
        let matching = rows.iter().filter(|r| r.title == title).cloned().collect();
        Ok(Self::newest_first(matching))
    }

    async fn find_all(&self) -> Result<Vec<Perk>, StoreError> {
        self.record_call();
        let rows = self.rows.lock().unwrap();
        Ok(Self::newest_first(rows.clone()))
    }

    async fn update_by_id(
        &self,
        id: DbId,
        changes: &PerkChanges,
    ) -> Result<Option<Perk>, StoreError> {
        self.record_call();
        let mut rows = self.rows.lock().unwrap();
        let Some(index) = rows.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        let mut updated = rows[index].clone();
        if let Some(title) = &changes.title {
            updated.title = title.clone();
        }
        if let Some(description) = &changes.description {
            updated.description = description.clone();
        }
        if let Some(category) = changes.category {
            updated.category = category;
        }
        if let Some(percent) = changes.discount_percent {
            updated.discount_percent = percent;
        }
        if let Some(merchant) = &changes.merchant {
            updated.merchant = Some(merchant.clone());
        }
        if Self::is_duplicate(&rows, Some(id), &updated.title, &updated.merchant) {
            return Err(Self::duplicate());
        }
        updated.updated_at = updated.updated_at + Duration::milliseconds(1);

        rows[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError> {
        self.record_call();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store whose every call fails with a connection-level error.
pub struct UnavailablePerkStore;

impl UnavailablePerkStore {
    fn error() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl PerkStore for UnavailablePerkStore {
    async fn insert(&self, _perk: &NewPerk) -> Result<Perk, StoreError> {
        Err(Self::error())
    }

    async fn find_by_id(&self, _id: DbId) -> Result<Option<Perk>, StoreError> {
        Err(Self::error())
    }

    async fn find_by_title(&self, _title: &str) -> Result<Vec<Perk>, StoreError> {
        Err(Self::error())
    }

    async fn find_all(&self) -> Result<Vec<Perk>, StoreError> {
        Err(Self::error())
    }

    async fn update_by_id(
        &self,
        _id: DbId,
        _changes: &PerkChanges,
    ) -> Result<Option<Perk>, StoreError> {
        Err(Self::error())
    }

    async fn delete_by_id(&self, _id: DbId) -> Result<bool, StoreError> {
        Err(Self::error())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(Self::error())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
