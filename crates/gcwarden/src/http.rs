//! The HTTP control API.
//!
//! Three GET routes (`/list`, `/add`, `/remove`) plus a 400 fallback,
//! every one of them gated by an exact shared-secret match *before* any
//! registry access. Handlers are thin: parse and validate the query,
//! forward to the session actor, map domain errors to status codes.
//!
//! Status mapping: missing/invalid parameter or identity → 400,
//! key mismatch → 401, registry at capacity → 507, actor gone → 500.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use gcwarden_protocol::AccountId;
use gcwarden_registry::RegistryError;
use gcwarden_session::SessionHandle;
use serde::Deserialize;
use serde_json::json;

/// Shared state for every control route.
#[derive(Clone)]
pub(crate) struct ControlState {
    pub(crate) handle: SessionHandle,
    pub(crate) key: String,
}

/// Builds the control router with the secret gate installed.
pub fn control_router(handle: SessionHandle, key: String) -> Router {
    let state = ControlState { handle, key };
    Router::new()
        .route("/list", get(list))
        .route("/add", get(add))
        .route("/remove", get(remove))
        .fallback(unknown_route)
        .layer(middleware::from_fn_with_state(state.clone(), require_key))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Secret gate
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct KeyParam {
    key: Option<String>,
}

/// Rejects any request whose `key` query parameter doesn't exactly match
/// the configured secret. Runs before routing hands the request to a
/// handler, so a mismatch never touches the registry.
async fn require_key(
    State(state): State<ControlState>,
    req: Request,
    next: Next,
) -> Response {
    let provided = Query::<KeyParam>::try_from_uri(req.uri())
        .ok()
        .and_then(|q| q.0.key);

    if provided.as_deref() != Some(state.key.as_str()) {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "Key mismatch, retrying will not help",
        );
    }

    next.run(req).await
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

async fn list(State(state): State<ControlState>) -> Response {
    let targets = match state.handle.list_targets().await {
        Ok(t) => t,
        Err(err) => return actor_gone(&err),
    };

    let users: Vec<_> = targets
        .iter()
        .map(|t| {
            json!({
                "id": t.account.into_inner(),
                "expiresAt": epoch_millis(t.expires_at),
            })
        })
        .collect();

    Json(json!({ "success": true, "users": users })).into_response()
}

#[derive(Deserialize)]
struct AddParams {
    id: Option<String>,
    length: Option<String>,
}

async fn add(
    State(state): State<ControlState>,
    Query(params): Query<AddParams>,
) -> Response {
    let Some(id) = params.id else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Request is missing 'id' parameter",
        );
    };
    let Some(length) = params.length else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Request is missing 'length' parameter",
        );
    };

    let Ok(account) = id.parse::<AccountId>() else {
        return invalid_account();
    };

    // Non-numeric lengths collapse to 0, which the registry rejects with
    // the same range message a bad numeric value gets.
    let ttl_secs = length.parse::<u64>().unwrap_or(0);

    match state.handle.add_target(account, ttl_secs).await {
        Ok(Ok(outcome)) => Json(json!({
            "success": outcome.created,
            "expiresAt": epoch_millis(outcome.expires_at),
        }))
        .into_response(),
        Ok(Err(err @ RegistryError::InvalidTtl { .. })) => {
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Ok(Err(err @ RegistryError::CapacityExceeded { .. })) => {
            error_response(
                StatusCode::INSUFFICIENT_STORAGE,
                &err.to_string(),
            )
        }
        Err(err) => actor_gone(&err),
    }
}

#[derive(Deserialize)]
struct RemoveParams {
    id: Option<String>,
}

async fn remove(
    State(state): State<ControlState>,
    Query(params): Query<RemoveParams>,
) -> Response {
    let Some(id) = params.id else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Request is missing 'id' parameter",
        );
    };
    let Ok(account) = id.parse::<AccountId>() else {
        return invalid_account();
    };

    match state.handle.remove_target(account).await {
        Ok(removed) => {
            Json(json!({ "success": removed })).into_response()
        }
        Err(err) => actor_gone(&err),
    }
}

async fn unknown_route() -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "Invalid request, view code for more information",
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn invalid_account() -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "AccountID is not a valid individual account",
    )
}

fn actor_gone(err: &gcwarden_session::SessionError) -> Response {
    tracing::error!(error = %err, "control request hit a dead session actor");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Session is not available",
    )
}

/// Converts a wall-clock expiry into the epoch-milliseconds form the API
/// reports.
fn epoch_millis(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
