#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use people_api::{
    app, Address, AddressChanges, AppError, AppState, NewAddress, NewPerson, Person, PersonChanges,
    Store,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct Tables {
    people: Vec<Person>,
    addresses: Vec<Address>,
    next_person_id: i64,
    next_address_id: i64,
}

fn unique_violation(index: &str) -> AppError {
    AppError::Db(sqlx::Error::Protocol(format!(
        "duplicate key value violates unique constraint \"{}\"",
        index
    )))
}

/// In-memory store with the same soft-delete and live-row uniqueness rules as the PostgreSQL one.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_cascade: bool,
}

impl MemoryStore {
    pub fn failing_cascade() -> Self {
        Self {
            fail_cascade: true,
            ..Default::default()
        }
    }

    pub fn person_count(&self) -> usize {
        self.tables.lock().unwrap().people.iter().filter(|p| p.deleted_at.is_none()).count()
    }

    /// Includes soft-deleted rows.
    pub fn raw_address(&self, id: i64) -> Option<Address> {
        self.tables.lock().unwrap().addresses.iter().find(|a| a.id == id).cloned()
    }

    pub fn raw_person(&self, id: i64) -> Option<Person> {
        self.tables.lock().unwrap().people.iter().find(|p| p.id == id).cloned()
    }
}

impl Tables {
    fn email_taken(&self, email: &str, except: i64) -> bool {
        self.people
            .iter()
            .any(|p| p.deleted_at.is_none() && p.id != except && p.email == email)
    }

    fn mobile_taken(&self, mobile: &str, except: i64) -> bool {
        self.addresses
            .iter()
            .any(|a| a.deleted_at.is_none() && a.id != except && a.mobile == mobile)
    }

    fn person_exists(&self, id: i64) -> bool {
        self.people.iter().any(|p| p.id == id)
    }

    fn insert_address(&mut self, address: &NewAddress) -> Result<Address, AppError> {
        if !self.person_exists(address.person_id) {
            return Err(AppError::Db(sqlx::Error::Protocol(
                "insert or update on table \"addresses\" violates foreign key constraint \"fk_addresses_person\"".into(),
            )));
        }
        if self.mobile_taken(&address.mobile, 0) {
            return Err(unique_violation("uix_addresses_mobile"));
        }
        self.next_address_id += 1;
        let now = Utc::now();
        let row = Address {
            id: self.next_address_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            person_id: address.person_id,
            city: address.city.clone(),
            state: address.state.clone(),
            mobile: address.mobile.clone(),
        };
        self.addresses.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_persons(&self) -> Result<Vec<Person>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.people.iter().filter(|p| p.deleted_at.is_none()).cloned().collect())
    }

    async fn get_person(&self, id: i64) -> Result<Option<Person>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.people.iter().find(|p| p.id == id && p.deleted_at.is_none()).cloned())
    }

    async fn create_person(&self, person: &NewPerson) -> Result<Person, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.email_taken(&person.email, 0) {
            return Err(unique_violation("uix_people_email"));
        }
        let mobiles: Vec<&str> = person.addresses.iter().map(|a| a.mobile.as_str()).collect();
        if mobiles.iter().any(|m| t.mobile_taken(m, 0))
            || (1..mobiles.len()).any(|i| mobiles[..i].contains(&mobiles[i]))
        {
            return Err(unique_violation("uix_addresses_mobile"));
        }
        t.next_person_id += 1;
        let now = Utc::now();
        let mut row = Person {
            id: t.next_person_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            name: person.name.clone(),
            skills: person.skills.clone(),
            email: person.email.clone(),
            addresses: Vec::new(),
        };
        t.people.push(row.clone());
        for nested in &person.addresses {
            let address = t.insert_address(&nested.clone().owned_by(row.id))?;
            row.addresses.push(address);
        }
        Ok(row)
    }

    async fn update_person(&self, id: i64, changes: &PersonChanges) -> Result<Option<Person>, AppError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(ref email) = changes.email {
            if t.email_taken(email, id) {
                return Err(unique_violation("uix_people_email"));
            }
        }
        let Some(person) = t.people.iter_mut().find(|p| p.id == id && p.deleted_at.is_none()) else {
            return Ok(None);
        };
        changes.apply_to(person);
        person.updated_at = Utc::now();
        Ok(Some(person.clone()))
    }

    async fn delete_person(&self, id: i64) -> Result<u64, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = Utc::now();
        let mut n = 0;
        for p in t.people.iter_mut().filter(|p| p.id == id && p.deleted_at.is_none()) {
            p.deleted_at = Some(now);
            n += 1;
        }
        Ok(n)
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.addresses.iter().filter(|a| a.deleted_at.is_none()).cloned().collect())
    }

    async fn addresses_for_person(&self, person_id: i64) -> Result<Vec<Address>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.addresses
            .iter()
            .filter(|a| a.person_id == person_id && a.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn get_address(&self, id: i64) -> Result<Option<Address>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.addresses.iter().find(|a| a.id == id && a.deleted_at.is_none()).cloned())
    }

    async fn create_address(&self, address: &NewAddress) -> Result<Address, AppError> {
        self.tables.lock().unwrap().insert_address(address)
    }

    async fn update_address(&self, id: i64, changes: &AddressChanges) -> Result<Option<Address>, AppError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(ref mobile) = changes.mobile {
            if t.mobile_taken(mobile, id) {
                return Err(unique_violation("uix_addresses_mobile"));
            }
        }
        let Some(address) = t.addresses.iter_mut().find(|a| a.id == id && a.deleted_at.is_none()) else {
            return Ok(None);
        };
        changes.apply_to(address);
        address.updated_at = Utc::now();
        Ok(Some(address.clone()))
    }

    async fn delete_address(&self, id: i64) -> Result<u64, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = Utc::now();
        let mut n = 0;
        for a in t.addresses.iter_mut().filter(|a| a.id == id && a.deleted_at.is_none()) {
            a.deleted_at = Some(now);
            n += 1;
        }
        Ok(n)
    }

    async fn delete_addresses_for_person(&self, person_id: i64) -> Result<u64, AppError> {
        if self.fail_cascade {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        let mut t = self.tables.lock().unwrap();
        let now = Utc::now();
        let mut n = 0;
        for a in t
            .addresses
            .iter_mut()
            .filter(|a| a.person_id == person_id && a.deleted_at.is_none())
        {
            a.deleted_at = Some(now);
            n += 1;
        }
        Ok(n)
    }
}

pub fn setup_test_app(store: MemoryStore) -> Router {
    app(AppState::new(store))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Sends a JSON body without any `Content-Type` header, like `curl -d`.
pub async fn send_untyped(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

static MIGRATE_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// Pool on `DATABASE_URL` with the schema migrated, or `None` when no database is configured.
pub async fn setup_pg_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty())?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to DATABASE_URL");
    // Concurrent CREATE TABLE IF NOT EXISTS can still collide in pg_type.
    let _guard = MIGRATE_LOCK.lock().await;
    people_api::auto_migrate(&pool)
        .await
        .expect("Failed to migrate test database");
    Some(pool)
}

/// Suffix that keeps unique columns distinct across tests sharing one database.
pub fn unique_suffix() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}{}", nanos, COUNTER.fetch_add(1, Ordering::Relaxed))
}
