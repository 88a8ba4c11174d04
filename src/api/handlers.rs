//! HTTP request handlers

use super::types::{
    ErrorResponse, EventBatchRequest, EventBatchResponse, EventReply, MenuListingResponse,
    MenuQuery, SuccessResponse,
};
use super::AppState;
use crate::branch::Branch;
use crate::menu::Resolution;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/version", get(get_version))
        // Normalized inbound events from the chat transport
        .route("/api/events", post(handle_events))
        // Direct price lookup
        .route("/api/menu/:branch/:category", get(get_menu))
        // Forget a user's session
        .route("/api/users/:user_id", delete(forget_user))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn get_version() -> &'static str {
    concat!("salon-concierge ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Inbound Events
// ============================================================

async fn handle_events(
    State(state): State<AppState>,
    Json(req): Json<EventBatchRequest>,
) -> Result<Json<EventBatchResponse>, AppError> {
    if let Some(event) = req.events.iter().find(|e| e.user_id.trim().is_empty()) {
        return Err(AppError::BadRequest(format!(
            "Event of kind {} has an empty user_id",
            event.kind_name()
        )));
    }

    let ids: Vec<(String, Option<String>)> = req
        .events
        .iter()
        .map(|e| (e.user_id.clone(), e.event_id.clone()))
        .collect();
    tracing::debug!(count = ids.len(), "Received event batch");

    let results = state.runtime.dispatch_batch(req.events).await;
    let replies = ids
        .into_iter()
        .zip(results)
        .map(|((user_id, event_id), result)| match result {
            Ok(prompts) => EventReply {
                user_id,
                event_id,
                prompts,
                error: None,
            },
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Event not handled");
                EventReply {
                    user_id,
                    event_id,
                    prompts: vec![],
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    Ok(Json(EventBatchResponse { replies }))
}

// ============================================================
// Menu Lookup
// ============================================================

async fn get_menu(
    State(state): State<AppState>,
    Path((branch, category)): Path<(String, String)>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<MenuListingResponse>, AppError> {
    let branch = Branch::from_id(&branch)
        .ok_or_else(|| AppError::NotFound(format!("Unknown branch: {branch}")))?;
    let resolver = state.resolver();
    let length = query.length.filter(|l| !l.trim().is_empty());

    let resolution = resolver.resolve(branch.id(), &category, length.as_deref());
    if resolution == Resolution::UnknownCategory {
        return Err(AppError::NotFound("Menu not found.".to_string()));
    }

    let lengths = if length.is_none() && resolver.requires_length(&category) {
        resolver.lengths(branch.id()).to_vec()
    } else {
        vec![]
    };

    Ok(Json(MenuListingResponse {
        branch: branch.id().to_string(),
        category,
        length,
        lengths,
        lines: resolver.render_lines(&resolution),
    }))
}

// ============================================================
// Sessions
// ============================================================

async fn forget_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let existed = state
        .runtime
        .forget(&user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !existed {
        return Err(AppError::NotFound(format!("No session for user {user_id}")));
    }
    tracing::info!(user_id = %user_id, "Session forgotten");
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
