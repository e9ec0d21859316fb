//! Review endpoints — user-scoped listing/show, work-scoped CRUD.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::review::Review;
use crate::models::work::Work;
use crate::routes::error::ApiError;
use crate::routes::{auth, db_conn, notice_locale, request_locale, AppState};
use crate::services::review_service::{self, ReviewInput, ShareFlags};
use crate::services::{share_service, user_service, work_service};
use crate::{locale, metrics};

// ── DTOs ──

/// JSON response for a single review.
#[derive(Debug, Serialize)]
pub struct ReviewJson {
    pub id: i64,
    pub user_id: i64,
    pub work_id: i64,
    pub title: Option<String>,
    pub body: String,
    pub rating_animation_state: Option<String>,
    pub rating_music_state: Option<String>,
    pub rating_story_state: Option<String>,
    pub rating_character_state: Option<String>,
    pub rating_overall_state: String,
    pub locale: String,
    pub impressions_count: i32,
    pub modified_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Review> for ReviewJson {
    fn from(r: Review) -> Self {
        ReviewJson {
            id: r.id,
            user_id: r.user_id,
            work_id: r.work_id,
            title: r.title,
            body: r.body,
            rating_animation_state: r.rating_animation_state,
            rating_music_state: r.rating_music_state,
            rating_story_state: r.rating_story_state,
            rating_character_state: r.rating_character_state,
            rating_overall_state: r.rating_overall_state,
            locale: r.locale,
            impressions_count: r.impressions_count,
            modified_at: r.modified_at,
            created_at: r.created_at,
        }
    }
}

/// Work summary embedded in index responses for signed-in callers.
#[derive(Debug, Serialize)]
pub struct WorkSummaryJson {
    pub id: i64,
    pub title: String,
    pub media: String,
    pub image_url: Option<String>,
    pub reviews_count: i32,
}

impl From<Work> for WorkSummaryJson {
    fn from(w: Work) -> Self {
        WorkSummaryJson {
            id: w.id,
            title: w.title,
            media: w.media,
            image_url: w.image_url,
            reviews_count: w.reviews_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewIndexResponse {
    pub reviews: Vec<ReviewJson>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    /// Present only for authenticated callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_list: Option<Vec<WorkSummaryJson>>,
}

#[derive(Debug, Serialize)]
pub struct ReviewShowResponse {
    pub review: ReviewJson,
    pub work: WorkSummaryJson,
    pub is_spoiler: bool,
    pub other_reviews: Vec<ReviewJson>,
}

/// Nested setting attributes submitted with a review.
#[derive(Debug, Default, Deserialize)]
pub struct SettingParams {
    pub share_review_to_twitter: Option<bool>,
    pub share_review_to_facebook: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub title: Option<String>,
    pub body: String,
    pub rating_animation_state: Option<String>,
    pub rating_music_state: Option<String>,
    pub rating_story_state: Option<String>,
    pub rating_character_state: Option<String>,
    pub rating_overall_state: Option<String>,
    #[serde(default)]
    pub setting: Option<SettingParams>,
}

impl ReviewRequest {
    fn input(&self) -> ReviewInput {
        ReviewInput {
            title: self.title.clone(),
            body: self.body.clone(),
            rating_animation_state: self.rating_animation_state.clone(),
            rating_music_state: self.rating_music_state.clone(),
            rating_story_state: self.rating_story_state.clone(),
            rating_character_state: self.rating_character_state.clone(),
            rating_overall_state: self.rating_overall_state.clone(),
        }
    }

    fn share_flags(&self) -> ShareFlags {
        match &self.setting {
            Some(s) => ShareFlags {
                twitter: s.share_review_to_twitter,
                facebook: s.share_review_to_facebook,
            },
            None => ShareFlags::default(),
        }
    }
}

/// Success body carrying the localized notice and canonical location.
#[derive(Debug, Serialize)]
pub struct ReviewMutationResponse {
    pub notice: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewJson>,
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub page: Option<i64>,
    pub locale: Option<String>,
}

// ── Handlers ──

/// GET /users/{username}/reviews
pub async fn index(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<IndexQuery>,
    headers: HeaderMap,
) -> Result<Json<ReviewIndexResponse>, ApiError> {
    let mut conn = db_conn(&state).await?;
    let viewer = auth::maybe_authenticate(&mut conn, &headers).await?;

    let user = user_service::find_by_username(&mut conn, &username)
        .await?
        .ok_or(ApiError::NotFound)?;

    let locale = request_locale(query.locale.as_deref(), &headers);
    let page = query.page.unwrap_or(1);
    let (items, total) =
        review_service::list_published(&mut conn, user.id, locale, page, state.config.per_page)
            .await?;

    // The work-list payload is only assembled for signed-in callers
    let work_list = if viewer.is_some() {
        let ids: Vec<i64> = items
            .iter()
            .map(|r| r.work_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let works = work_service::list_by_ids(&mut conn, &ids).await?;
        Some(works.into_iter().map(WorkSummaryJson::from).collect())
    } else {
        None
    };

    Ok(Json(ReviewIndexResponse {
        reviews: items.into_iter().map(ReviewJson::from).collect(),
        page: page.max(1),
        per_page: state.config.per_page,
        total_count: total,
        work_list,
    }))
}

/// GET /users/{username}/reviews/{id}
pub async fn show(
    State(state): State<AppState>,
    Path((username, review_id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Result<Json<ReviewShowResponse>, ApiError> {
    let mut conn = db_conn(&state).await?;
    let viewer = auth::maybe_authenticate(&mut conn, &headers).await?;

    let user = user_service::find_by_username(&mut conn, &username)
        .await?
        .ok_or(ApiError::NotFound)?;
    let review = review_service::find_published(&mut conn, user.id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let work = work_service::find(&mut conn, review.work_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let is_spoiler = match &viewer {
        Some(v) if v.id != review.user_id => {
            user_service::setting_for(&mut conn, v.id)
                .await?
                .hide_review_bodies
        }
        _ => false,
    };

    let other_reviews = review_service::other_published(&mut conn, user.id, review.id).await?;
    review_service::increment_impressions(&mut conn, review.id).await?;

    Ok(Json(ReviewShowResponse {
        review: ReviewJson::from(review),
        work: WorkSummaryJson::from(work),
        is_spoiler,
        other_reviews: other_reviews.into_iter().map(ReviewJson::from).collect(),
    }))
}

/// GET /works/{work_id}/reviews
pub async fn index_for_work(
    State(state): State<AppState>,
    Path(work_id): Path<i64>,
    Query(query): Query<IndexQuery>,
) -> Result<Json<ReviewIndexResponse>, ApiError> {
    let mut conn = db_conn(&state).await?;

    work_service::find(&mut conn, work_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let page = query.page.unwrap_or(1);
    let (items, total) =
        review_service::list_for_work(&mut conn, work_id, page, state.config.per_page).await?;

    Ok(Json(ReviewIndexResponse {
        reviews: items.into_iter().map(ReviewJson::from).collect(),
        page: page.max(1),
        per_page: state.config.per_page,
        total_count: total,
        work_list: None,
    }))
}

/// POST /works/{work_id}/reviews
pub async fn create(
    State(state): State<AppState>,
    Path(work_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<ReviewMutationResponse>), ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;

    work_service::find(&mut conn, work_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let input = req.input();
    review_service::validate(&input)?;

    let review =
        review_service::create_review(&mut conn, user.id, work_id, input, req.share_flags())
            .await?;

    // Enqueue share jobs per the just-applied setting flags
    let setting = user_service::setting_for(&mut conn, user.id).await?;
    share_service::enqueue_for_review(&mut conn, user.id, review.id, &setting).await?;
    metrics::review_event("created");

    let locale = notice_locale(None, &headers);
    let location = format!("/users/{}/reviews/{}", user.username, review.id);
    Ok((
        StatusCode::CREATED,
        Json(ReviewMutationResponse {
            notice: locale::notice(locale, "review.posted"),
            location,
            review: Some(ReviewJson::from(review)),
        }),
    ))
}

/// PATCH /reviews/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewMutationResponse>, ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;

    let review = review_service::find_published(&mut conn, user.id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    auth::authorize_author(&user, &review)?;

    let input = req.input();
    review_service::validate(&input)?;

    let review =
        review_service::update_review(&mut conn, review.id, user.id, input, req.share_flags())
            .await?;

    let setting = user_service::setting_for(&mut conn, user.id).await?;
    share_service::enqueue_for_review(&mut conn, user.id, review.id, &setting).await?;
    metrics::review_event("updated");

    let locale = notice_locale(None, &headers);
    let location = format!("/users/{}/reviews/{}", user.username, review.id);
    Ok(Json(ReviewMutationResponse {
        notice: locale::notice(locale, "review.updated"),
        location,
        review: Some(ReviewJson::from(review)),
    }))
}

/// DELETE /reviews/{id}
pub async fn destroy(
    State(state): State<AppState>,
    Path(review_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ReviewMutationResponse>, ApiError> {
    let mut conn = db_conn(&state).await?;
    let user = auth::authenticate(&mut conn, &headers).await?;

    let review = review_service::find_published(&mut conn, user.id, review_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    auth::authorize_author(&user, &review)?;

    review_service::delete_review(&mut conn, &review).await?;
    metrics::review_event("deleted");

    let locale = notice_locale(None, &headers);
    Ok(Json(ReviewMutationResponse {
        notice: locale::notice(locale, "review.deleted"),
        location: format!("/works/{}/reviews", review.work_id),
        review: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_request_maps_nested_setting_to_share_flags() {
        let req: ReviewRequest = serde_json::from_value(serde_json::json!({
            "body": "Loved it.",
            "rating_overall_state": "great",
            "setting": { "share_review_to_twitter": true }
        }))
        .unwrap();
        let flags = req.share_flags();
        assert_eq!(flags.twitter, Some(true));
        assert_eq!(flags.facebook, None);
    }

    #[test]
    fn review_request_without_setting_leaves_flags_untouched() {
        let req: ReviewRequest = serde_json::from_value(serde_json::json!({
            "body": "Loved it.",
            "rating_overall_state": "great"
        }))
        .unwrap();
        let flags = req.share_flags();
        assert_eq!(flags.twitter, None);
        assert_eq!(flags.facebook, None);
    }
}
