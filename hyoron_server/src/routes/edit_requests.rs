//! Catalog edit request endpoints.
//!
//! Any signed-in user may propose an edit; updating an existing request
//! is limited to its requester or staff. The requester never changes on
//! update.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::edit_request::EditRequest;
use crate::models::user::User;
use crate::routes::error::ApiError;
use crate::routes::{auth, db_conn, notice_locale, AppState};
use crate::services::{edit_request_service, work_service};
use crate::{locale, metrics};

// ── DTOs ──

#[derive(Debug, Serialize)]
pub struct EditRequestJson {
    pub id: i64,
    pub user_id: i64,
    pub work_id: i64,
    pub proposal: serde_json::Value,
    pub comment: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<EditRequest> for EditRequestJson {
    fn from(e: EditRequest) -> Self {
        EditRequestJson {
            id: e.id,
            user_id: e.user_id,
            work_id: e.work_id,
            proposal: e.proposal,
            comment: e.comment,
            status: e.status,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEditRequestRequest {
    pub proposal: serde_json::Value,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEditRequestRequest {
    pub proposal: Option<serde_json::Value>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EditRequestMutationResponse {
    pub notice: String,
    pub location: String,
    pub edit_request: EditRequestJson,
}

fn edit_request_path(id: i64) -> String {
    format!("/db/edit_requests/{id}")
}

fn authorize_update(user: &User, edit_request: &EditRequest) -> Result<(), ApiError> {
    if edit_request.user_id == user.id || user.is_staff() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

// ── Handlers ──

/// POST /db/works/{work_id}/edit_requests
pub async fn create(
    State(state): State<AppState>,
    Path(work_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<CreateEditRequestRequest>,
) -> Result<(StatusCode, Json<EditRequestMutationResponse>), ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;

    work_service::find(&mut conn, work_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    edit_request_service::validate(&req.proposal, req.comment.as_deref())?;

    let edit_request = edit_request_service::create_edit_request(
        &mut conn,
        user.id,
        work_id,
        req.proposal,
        req.comment,
    )
    .await?;
    metrics::edit_request_event("created");

    let locale = notice_locale(None, &headers);
    let location = edit_request_path(edit_request.id);
    Ok((
        StatusCode::CREATED,
        Json(EditRequestMutationResponse {
            notice: locale::notice(locale, "edit_request.created"),
            location,
            edit_request: EditRequestJson::from(edit_request),
        }),
    ))
}

/// GET /db/edit_requests/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(edit_request_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<EditRequestJson>, ApiError> {
    let mut conn = db_conn(&state).await?;
    auth::authenticate(&mut conn, &headers).await?;

    let edit_request = edit_request_service::find(&mut conn, edit_request_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(EditRequestJson::from(edit_request)))
}

/// PATCH /db/edit_requests/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(edit_request_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<UpdateEditRequestRequest>,
) -> Result<Json<EditRequestMutationResponse>, ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;

    let edit_request = edit_request_service::find(&mut conn, edit_request_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    authorize_update(&user, &edit_request)?;

    edit_request_service::validate_update(req.proposal.as_ref(), req.comment.as_deref())?;

    let edit_request = edit_request_service::update_edit_request(
        &mut conn,
        edit_request.id,
        req.proposal,
        req.comment,
    )
    .await?;
    metrics::edit_request_event("updated");

    let locale = notice_locale(None, &headers);
    let location = edit_request_path(edit_request.id);
    Ok(Json(EditRequestMutationResponse {
        notice: locale::notice(locale, "edit_request.updated"),
        location,
        edit_request: EditRequestJson::from(edit_request),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, role: &str) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            role: role.to_string(),
            api_token_digest: None,
            active: true,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn edit_request_by(user_id: i64) -> EditRequest {
        EditRequest {
            id: 1,
            user_id,
            work_id: 1,
            proposal: serde_json::json!({"title": "x"}),
            comment: None,
            status: "pending".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn requester_may_update() {
        assert!(authorize_update(&user(5, "user"), &edit_request_by(5)).is_ok());
    }

    #[test]
    fn staff_may_update_any_request() {
        assert!(authorize_update(&user(9, "editor"), &edit_request_by(5)).is_ok());
    }

    #[test]
    fn other_users_may_not_update() {
        assert!(authorize_update(&user(9, "user"), &edit_request_by(5)).is_err());
    }
}
