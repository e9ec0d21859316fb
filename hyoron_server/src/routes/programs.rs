//! Broadcast program endpoints — work-scoped CRUD, staff only.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::program::Program;
use crate::routes::error::ApiError;
use crate::routes::{auth, db_conn, notice_locale, AppState};
use crate::services::program_service::{self, ProgramInput, ProgramUpdate};
use crate::services::work_service;
use crate::{locale, metrics};

// ── DTOs ──

#[derive(Debug, Serialize)]
pub struct ProgramJson {
    pub id: i64,
    pub work_id: i64,
    pub channel_id: i64,
    pub episode_number: Option<i32>,
    pub started_at: DateTime<Utc>,
}

impl From<Program> for ProgramJson {
    fn from(p: Program) -> Self {
        ProgramJson {
            id: p.id,
            work_id: p.work_id,
            channel_id: p.channel_id,
            episode_number: p.episode_number,
            started_at: p.started_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgramIndexResponse {
    pub programs: Vec<ProgramJson>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProgramRequest {
    pub channel_id: i64,
    pub episode_number: Option<i32>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgramRequest {
    pub channel_id: Option<i64>,
    pub episode_number: Option<i32>,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ProgramMutationResponse {
    pub notice: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<ProgramJson>,
}

fn programs_path(work_id: i64) -> String {
    format!("/works/{work_id}/programs")
}

// ── Handlers ──

/// GET /works/{work_id}/programs
pub async fn index(
    State(state): State<AppState>,
    Path(work_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ProgramIndexResponse>, ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;
    auth::authorize_staff(&user)?;

    work_service::find(&mut conn, work_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let programs = program_service::list_for_work(&mut conn, work_id).await?;
    Ok(Json(ProgramIndexResponse {
        programs: programs.into_iter().map(ProgramJson::from).collect(),
    }))
}

/// GET /works/{work_id}/programs/{id}
pub async fn show(
    State(state): State<AppState>,
    Path((work_id, program_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<Json<ProgramJson>, ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;
    auth::authorize_staff(&user)?;

    let program = program_service::find_in_work(&mut conn, work_id, program_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(ProgramJson::from(program)))
}

/// POST /works/{work_id}/programs
pub async fn create(
    State(state): State<AppState>,
    Path(work_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<ProgramMutationResponse>), ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;
    auth::authorize_staff(&user)?;

    work_service::find(&mut conn, work_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let input = ProgramInput {
        channel_id: req.channel_id,
        episode_number: req.episode_number,
        started_at: req.started_at,
    };
    program_service::validate(&input)?;

    let program = program_service::create_program(&mut conn, work_id, input).await?;
    metrics::program_event("created");

    let locale = notice_locale(None, &headers);
    Ok((
        StatusCode::CREATED,
        Json(ProgramMutationResponse {
            notice: locale::notice(locale, "program.created"),
            location: programs_path(work_id),
            program: Some(ProgramJson::from(program)),
        }),
    ))
}

/// PATCH /works/{work_id}/programs/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((work_id, program_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(req): Json<UpdateProgramRequest>,
) -> Result<Json<ProgramMutationResponse>, ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;
    auth::authorize_staff(&user)?;

    let program = program_service::find_in_work(&mut conn, work_id, program_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let update = ProgramUpdate {
        channel_id: req.channel_id,
        episode_number: req.episode_number,
        started_at: req.started_at,
    };
    program_service::validate_update(&update)?;

    let program = program_service::update_program(&mut conn, program.id, update).await?;
    metrics::program_event("updated");

    let locale = notice_locale(None, &headers);
    Ok(Json(ProgramMutationResponse {
        notice: locale::notice(locale, "program.updated"),
        location: programs_path(work_id),
        program: Some(ProgramJson::from(program)),
    }))
}

/// DELETE /works/{work_id}/programs/{id}
pub async fn destroy(
    State(state): State<AppState>,
    Path((work_id, program_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<Json<ProgramMutationResponse>, ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;
    auth::authorize_staff(&user)?;

    let program = program_service::find_in_work(&mut conn, work_id, program_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    program_service::delete_program(&mut conn, program.id).await?;
    metrics::program_event("deleted");

    let locale = notice_locale(None, &headers);
    Ok(Json(ProgramMutationResponse {
        notice: locale::notice(locale, "program.deleted"),
        location: programs_path(work_id),
        program: None,
    }))
}
