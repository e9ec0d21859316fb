//! HTTP routes — reviews, programs, edit requests.

pub mod auth;
pub mod edit_requests;
pub mod error;
pub mod programs;
pub mod reviews;

use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;

use crate::config::AppConfig;
use crate::db::{DbConn, DbPool};
use crate::locale::{self, Locale};
use crate::routes::error::ApiError;

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

/// Build the platform's Axum router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        // Reviews
        .route("/users/{username}/reviews", get(reviews::index))
        .route("/users/{username}/reviews/{id}", get(reviews::show))
        .route(
            "/works/{work_id}/reviews",
            get(reviews::index_for_work).post(reviews::create),
        )
        .route(
            "/reviews/{id}",
            axum::routing::patch(reviews::update).delete(reviews::destroy),
        )
        // Broadcast programs (staff)
        .route(
            "/works/{work_id}/programs",
            get(programs::index).post(programs::create),
        )
        .route(
            "/works/{work_id}/programs/{id}",
            get(programs::show)
                .patch(programs::update)
                .delete(programs::destroy),
        )
        // Catalog edit requests
        .route(
            "/db/works/{work_id}/edit_requests",
            post(edit_requests::create),
        )
        .route(
            "/db/edit_requests/{id}",
            get(edit_requests::show).patch(edit_requests::update),
        )
        .with_state(state)
}

/// Check out a pooled connection, mapping pool exhaustion to a 500.
pub(crate) async fn db_conn(state: &AppState) -> Result<DbConn, ApiError> {
    state
        .pool
        .get()
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("db pool: {e}")))
}

/// Locale of the request, if it states one.
pub(crate) fn request_locale(query_locale: Option<&str>, headers: &HeaderMap) -> Option<Locale> {
    let accept = headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok());
    locale::negotiate(query_locale, accept)
}

/// Locale used for notice strings. Falls back to English.
pub(crate) fn notice_locale(query_locale: Option<&str>, headers: &HeaderMap) -> Locale {
    request_locale(query_locale, headers).unwrap_or(Locale::En)
}
