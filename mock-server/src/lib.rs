//! In-memory mock Matrix homeserver for integration tests.
//!
//! Implements just enough of the client-server r0 API to exercise the core
//! crate end-to-end: login (password and token), whoami, event send with
//! transaction-id deduplication, sync, room creation with a rate limit, and
//! profile display names. Error bodies use the protocol's
//! `{errcode, error, ...}` shape so the core's classifier sees realistic
//! 4xx responses.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// The one account the server knows.
pub const USER_ID: &str = "@alice:mock.local";
pub const USER_LOCALPART: &str = "alice";
pub const PASSWORD: &str = "wonderland";
/// Fixed one-time login token accepted by `m.login.token`.
pub const LOGIN_TOKEN: &str = "sesame";

/// Rooms allowed per server lifetime before `createRoom` starts rate
/// limiting with `M_LIMIT_EXCEEDED`.
pub const ROOM_CREATION_LIMIT: u32 = 2;

#[derive(Default)]
pub struct Homeserver {
    /// access token -> user id
    tokens: HashMap<String, String>,
    /// (room id, transaction id) -> event id, for send deduplication
    sent_events: HashMap<(String, String), String>,
    display_names: HashMap<String, String>,
    rooms_created: u32,
    event_counter: u64,
    sync_counter: u64,
}

pub type Db = Arc<RwLock<Homeserver>>;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Homeserver::default()));
    Router::new()
        .route("/_matrix/client/versions", get(versions))
        .route("/_matrix/client/r0/login", post(login))
        .route("/_matrix/client/r0/account/whoami", get(whoami))
        .route("/_matrix/client/r0/sync", get(sync))
        .route("/_matrix/client/r0/createRoom", post(create_room))
        .route(
            "/_matrix/client/r0/rooms/{room_id}/send/{event_type}/{txn_id}",
            put(send_event),
        )
        .route(
            "/_matrix/client/r0/profile/{user_id}/displayname",
            get(get_display_name).put(put_display_name),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Protocol error body with optional extra fields.
fn matrix_error(
    status: StatusCode,
    errcode: &str,
    message: &str,
    extra: &[(&str, Value)],
) -> (StatusCode, Json<Value>) {
    let mut body = json!({ "errcode": errcode, "error": message });
    for (key, value) in extra {
        body[*key] = value.clone();
    }
    (status, Json(body))
}

/// Resolve the bearer token to a user id, or produce the protocol's 401s.
async fn authenticate(db: &Db, headers: &HeaderMap) -> Result<String, (StatusCode, Json<Value>)> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            matrix_error(
                StatusCode::UNAUTHORIZED,
                "M_MISSING_TOKEN",
                "Missing access token",
                &[],
            )
        })?;

    let state = db.read().await;
    match state.tokens.get(token) {
        Some(user_id) => Ok(user_id.clone()),
        None => Err(matrix_error(
            StatusCode::UNAUTHORIZED,
            "M_UNKNOWN_TOKEN",
            "Invalid token",
            &[("soft_logout", json!(true))],
        )),
    }
}

async fn versions() -> Json<Value> {
    Json(json!({ "versions": ["r0.5.0", "r0.6.0", "r0.6.1"] }))
}

async fn login(State(db): State<Db>, Json(body): Json<Value>) -> ApiResult {
    let authenticated = match body["type"].as_str() {
        Some("m.login.password") => {
            let user = body["identifier"]["user"].as_str().unwrap_or_default();
            let password = body["password"].as_str().unwrap_or_default();
            (user == USER_LOCALPART || user == USER_ID) && password == PASSWORD
        }
        Some("m.login.token") => body["token"].as_str() == Some(LOGIN_TOKEN),
        _ => false,
    };

    if !authenticated {
        return Err(matrix_error(
            StatusCode::FORBIDDEN,
            "M_FORBIDDEN",
            "Invalid credentials",
            &[],
        ));
    }

    let access_token = Uuid::new_v4().to_string();
    db.write()
        .await
        .tokens
        .insert(access_token.clone(), USER_ID.to_string());
    Ok(Json(json!({
        "user_id": USER_ID,
        "access_token": access_token,
        "device_id": "MOCKDEV"
    })))
}

async fn whoami(State(db): State<Db>, headers: HeaderMap) -> ApiResult {
    let user_id = authenticate(&db, &headers).await?;
    Ok(Json(json!({ "user_id": user_id })))
}

async fn sync(State(db): State<Db>, headers: HeaderMap) -> ApiResult {
    authenticate(&db, &headers).await?;
    let mut state = db.write().await;
    state.sync_counter += 1;
    let next_batch = format!("s{}", state.sync_counter);
    Ok(Json(json!({
        "next_batch": next_batch,
        "rooms": { "join": {}, "invite": {}, "leave": {} }
    })))
}

async fn create_room(State(db): State<Db>, headers: HeaderMap) -> ApiResult {
    authenticate(&db, &headers).await?;
    let mut state = db.write().await;
    if state.rooms_created >= ROOM_CREATION_LIMIT {
        return Err(matrix_error(
            StatusCode::TOO_MANY_REQUESTS,
            "M_LIMIT_EXCEEDED",
            "Too many room creations",
            &[("retry_after_ms", json!(2000))],
        ));
    }
    state.rooms_created += 1;
    let room_id = format!("!r{}:mock.local", state.rooms_created);
    Ok(Json(json!({ "room_id": room_id })))
}

async fn send_event(
    State(db): State<Db>,
    Path((room_id, _event_type, txn_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(_content): Json<Value>,
) -> ApiResult {
    authenticate(&db, &headers).await?;
    let mut state = db.write().await;
    let key = (room_id, txn_id);
    if let Some(event_id) = state.sent_events.get(&key) {
        // Retried transaction: same event id, nothing stored twice.
        return Ok(Json(json!({ "event_id": event_id })));
    }
    state.event_counter += 1;
    let event_id = format!("$ev{}:mock.local", state.event_counter);
    state.sent_events.insert(key, event_id.clone());
    Ok(Json(json!({ "event_id": event_id })))
}

async fn get_display_name(State(db): State<Db>, Path(user_id): Path<String>) -> ApiResult {
    let state = db.read().await;
    match state.display_names.get(&user_id) {
        Some(name) => Ok(Json(json!({ "displayname": name }))),
        None => Err(matrix_error(
            StatusCode::NOT_FOUND,
            "M_NOT_FOUND",
            "Profile not found",
            &[],
        )),
    }
}

async fn put_display_name(
    State(db): State<Db>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult {
    authenticate(&db, &headers).await?;
    let name = body["displayname"].as_str().unwrap_or_default().to_string();
    db.write().await.display_names.insert(user_id, name);
    Ok(Json(json!({})))
}
