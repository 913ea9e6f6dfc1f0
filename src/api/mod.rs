//! HTTP API - axum router, shared state, and bearer-token middleware.
//!
//! Routes mirror the JSON API the mobile client expects. `/` and `/auth/*` are
//! always public; everything else requires a bearer token when
//! [`AppConfig::require_auth`] is set.

pub mod error;
mod handlers;


use crate::{
    config::AppConfig,
    core::auth::{AuthService, Claims},
    errors::Result,
};
use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

pub use error::AppError;

/// Maximum accepted request body
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Shared application state, built once at start-up.
#[derive(Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Credential and token service
    pub auth: AuthService,
    /// Settings the server was started with
    pub config: AppConfig,
}

impl AppState {
    /// Bundles the long-lived services handlers need.
    #[must_use]
    pub const fn new(db: DatabaseConnection, auth: AuthService, config: AppConfig) -> Self {
        Self { db, auth, config }
    }
}

/// Parses a JSON request body, answering 400 on malformed input.
pub(crate) fn parse_body<T: DeserializeOwned>(
    bytes: &[u8],
) -> std::result::Result<T, AppError> {
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {e}")))
}

/// Answers 403 when an authenticated caller acts on another user's data.
///
/// Without claims (authentication disabled) every user id is allowed.
pub(crate) fn ensure_owner(
    claims: Option<&Claims>,
    user_id: i64,
) -> std::result::Result<(), AppError> {
    match claims {
        Some(claims) if claims.user_id() != Some(user_id) => {
            warn!(caller = %claims.sub, user_id, "Rejected access to another user's data");
            Err(AppError::forbidden("Not allowed to access another user's data"))
        }
        _ => Ok(()),
    }
}

/// Rejects requests without a valid `Authorization: Bearer <token>` header.
///
/// Verified [`Claims`] are stored in the request extensions for handlers.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        warn!(path = %request.uri().path(), "Missing bearer token");
        return AppError::unauthorized("Missing bearer token").into_response();
    };

    match state.auth.verify_token(token) {
        Ok(claims) => {
            debug!(user = %claims.sub, path = %request.uri().path(), "Authenticated");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            warn!(error = %e, path = %request.uri().path(), "Rejected bearer token");
            AppError::from(e).into_response()
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!("Ignoring invalid CORS origin: {}", origin))
                .ok()
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Builds the full router over `state`.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);
    let state = Arc::new(state);

    let public = Router::new()
        .route("/", get(handlers::root))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/verify-details", post(handlers::verify_details))
        .route("/auth/reset-password", post(handlers::reset_password));

    let protected = Router::new()
        // Users
        .route("/users", get(handlers::list_users))
        .route("/users/", get(handlers::list_users))
        .route(
            "/users/:id",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_all_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/",
            get(handlers::list_all_expenses).post(handlers::create_expense),
        )
        .route("/expenses/:user_id", get(handlers::list_user_expenses))
        .route(
            "/expenses/analysis/:user_id",
            get(handlers::analyze_expenses),
        )
        // Saving goals
        .route("/goals", post(handlers::create_goal))
        .route("/goals/", post(handlers::create_goal))
        .route("/goals/user/:user_id", get(handlers::list_user_goals))
        .route("/goals/:goal_id", patch(handlers::update_goal))
        // Chatbot
        .route("/chatbot", post(handlers::chat))
        .route("/chatbot/", post(handlers::chat))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until the process exits.
pub async fn serve(state: AppState) -> Result<()> {
    let bind_address = state.config.bind_address.clone();
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);
    axum::serve(listener, router).await?;
    Ok(())
}
