//! In-memory stand-in for the rentals backend.
//!
//! Speaks the same wire contract as the real service: snake_case fields,
//! `_id` identifiers, and every response wrapped in
//! `{success, data, message, error}`. Protected routes require
//! `Authorization: Bearer <token>` with a token issued by `/api/auth/login`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "landlord@example.com";
pub const DEMO_PASSWORD: &str = "secret123";
/// Identity token the Google exchange accepts for the demo account.
pub const DEMO_GOOGLE_ID_TOKEN: &str = "demo-google-id-token";

struct Account {
    password: String,
    user: Value,
}

pub struct Backend {
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, String>,
    properties: Vec<Value>,
}

impl Backend {
    /// One landlord with two listings.
    pub fn seeded() -> Self {
        let user = json!({
            "_id": "u-1",
            "name": "Asha Landlord",
            "email": DEMO_EMAIL,
            "roles": ["landlord"],
            "landlord_profile": {
                "verification_status": "verified",
                "upi_id": "asha@upi",
                "bank_details": {"account_holder_name": "Asha", "ifsc_code": "ABCD0123456"}
            },
            "created_at": "2024-01-01T00:00:00Z"
        });

        let mut accounts = HashMap::new();
        accounts.insert(
            DEMO_EMAIL.to_string(),
            Account {
                password: DEMO_PASSWORD.to_string(),
                user,
            },
        );

        Self {
            accounts,
            sessions: HashMap::new(),
            properties: vec![
                property("p-1", "Sunny 2BHK near the park", "Pune", "2BHK", "vacant", 25000),
                property("p-2", "Compact studio", "Mumbai", "1RK", "occupied", 18000),
            ],
        }
    }
}

fn property(id: &str, title: &str, city: &str, bhk: &str, status: &str, rent: u64) -> Value {
    json!({
        "_id": id,
        "owner": "u-1",
        "title": title,
        "address": {"street": "1 Main Road", "city": city, "state": "MH", "pincode": "411001"},
        "specs": {
            "bhk": bhk,
            "property_type": "apartment",
            "bathrooms": 1,
            "balconies": 1,
            "furnishing_status": "semi_furnished",
            "size_sq_ft": 650
        },
        "amenities": ["lift", "parking"],
        "media": [],
        "expected_rent": rent,
        "expected_deposit": rent * 4,
        "status": status,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    app_with(Backend::seeded())
}

pub fn app_with(backend: Backend) -> Router {
    let db: Db = Arc::new(RwLock::new(backend));
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/firebase", post(google_login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/profile", put(update_profile))
        .route("/api/properties", get(list_properties))
        .route("/api/properties/{id}", get(get_property))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

fn ok(status: StatusCode, data: Value, message: Option<&str>) -> Response {
    let mut body = json!({"success": true, "data": data});
    if let Some(message) = message {
        body["message"] = json!(message);
    }
    (status, Json(body)).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"success": false, "error": {"message": message}})),
    )
        .into_response()
}

/// Resolve the bearer token to a user id, or the 401 to send back.
async fn authenticate(db: &Db, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Authentication required"))?;

    db.read()
        .await
        .sessions
        .get(token)
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
}

async fn health() -> Response {
    ok(StatusCode::OK, json!({"status": "ok"}), None)
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

async fn login(State(db): State<Db>, Json(input): Json<LoginRequest>) -> Response {
    let mut backend = db.write().await;
    let user = match backend.accounts.get(&input.email) {
        Some(account) if account.password == input.password => account.user.clone(),
        _ => return fail(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    };
    start_session(&mut backend, user)
}

#[derive(Deserialize)]
pub struct GoogleLoginRequest {
    pub id_token: String,
}

async fn google_login(State(db): State<Db>, Json(input): Json<GoogleLoginRequest>) -> Response {
    if input.id_token != DEMO_GOOGLE_ID_TOKEN {
        return fail(StatusCode::UNAUTHORIZED, "Invalid Google token");
    }
    let mut backend = db.write().await;
    let Some(user) = backend.accounts.get(DEMO_EMAIL).map(|account| account.user.clone()) else {
        return fail(StatusCode::NOT_FOUND, "User not found");
    };
    start_session(&mut backend, user)
}

fn start_session(backend: &mut Backend, user: Value) -> Response {
    let token = Uuid::new_v4().to_string();
    let user_id = user["_id"].as_str().unwrap_or_default().to_string();
    backend.sessions.insert(token.clone(), user_id);
    ok(
        StatusCode::OK,
        json!({"user": user, "token": token}),
        Some("Login successful"),
    )
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> Response {
    let user_id = match authenticate(&db, &headers).await {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    let backend = db.read().await;
    match backend
        .accounts
        .values()
        .find(|account| account.user["_id"] == user_id.as_str())
    {
        Some(account) => ok(StatusCode::OK, account.user.clone(), None),
        None => fail(StatusCode::NOT_FOUND, "User not found"),
    }
}

/// Merge `patch` into `target`, descending into objects present on both
/// sides.
fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(target.entry(key).or_insert(Value::Null), value);
            }
        }
        (target, patch) => *target = patch,
    }
}

async fn update_profile(State(db): State<Db>, headers: HeaderMap, Json(patch): Json<Value>) -> Response {
    let user_id = match authenticate(&db, &headers).await {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    if !patch.is_object() {
        return fail(StatusCode::BAD_REQUEST, "Profile update must be an object");
    }

    let mut backend = db.write().await;
    let Some(account) = backend
        .accounts
        .values_mut()
        .find(|account| account.user["_id"] == user_id.as_str())
    else {
        return fail(StatusCode::NOT_FOUND, "User not found");
    };
    merge(&mut account.user, patch);
    ok(
        StatusCode::OK,
        account.user.clone(),
        Some("Profile updated successfully"),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct PropertyQuery {
    pub status: Option<String>,
    pub city: Option<String>,
    pub bhk: Option<String>,
}

async fn list_properties(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<PropertyQuery>,
) -> Response {
    if let Err(response) = authenticate(&db, &headers).await {
        return response;
    }

    let matches = |value: &Value, filter: &Option<String>| {
        filter
            .as_deref()
            .map_or(true, |filter| value.as_str() == Some(filter))
    };

    let backend = db.read().await;
    let properties: Vec<Value> = backend
        .properties
        .iter()
        .filter(|p| matches(&p["status"], &query.status))
        .filter(|p| matches(&p["address"]["city"], &query.city))
        .filter(|p| matches(&p["specs"]["bhk"], &query.bhk))
        .cloned()
        .collect();
    ok(StatusCode::OK, json!({"properties": properties}), None)
}

async fn get_property(State(db): State<Db>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(response) = authenticate(&db, &headers).await {
        return response;
    }

    let backend = db.read().await;
    match backend.properties.iter().find(|p| p["_id"] == id.as_str()) {
        Some(property) => ok(StatusCode::OK, json!({"property": property}), None),
        None => fail(StatusCode::NOT_FOUND, "Property not found"),
    }
}
