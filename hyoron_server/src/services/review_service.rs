//! Review CRUD, validation, and the review/setting transaction.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::locale::{self, Locale};
use crate::models::review::{NewReview, Review, ReviewChangeset};
use crate::models::setting::NewUserSetting;
use crate::schema::{reviews, user_settings, works};
use crate::services::ValidationErrors;

/// Accepted values for every `rating_*_state` field.
pub const RATING_STATES: [&str; 4] = ["bad", "average", "good", "great"];

const BODY_MAX: usize = 20_000;
const TITLE_MAX: usize = 100;

/// Attributes accepted for review create and update.
#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub title: Option<String>,
    pub body: String,
    pub rating_animation_state: Option<String>,
    pub rating_music_state: Option<String>,
    pub rating_story_state: Option<String>,
    pub rating_character_state: Option<String>,
    pub rating_overall_state: Option<String>,
}

/// Nested setting attributes carried alongside a review submission.
/// `None` leaves the stored flag untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareFlags {
    pub twitter: Option<bool>,
    pub facebook: Option<bool>,
}

/// Validate review attributes. Collects every failure, not just the first.
pub fn validate(input: &ReviewInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if input.body.trim().is_empty() {
        errors.add("body", "can't be blank");
    } else if input.body.chars().count() > BODY_MAX {
        errors.add(
            "body",
            format!("is too long (maximum is {BODY_MAX} characters)"),
        );
    }

    if let Some(title) = &input.title {
        if title.chars().count() > TITLE_MAX {
            errors.add(
                "title",
                format!("is too long (maximum is {TITLE_MAX} characters)"),
            );
        }
    }

    let optional_states = [
        ("rating_animation_state", &input.rating_animation_state),
        ("rating_music_state", &input.rating_music_state),
        ("rating_story_state", &input.rating_story_state),
        ("rating_character_state", &input.rating_character_state),
    ];
    for (field, state) in optional_states {
        if let Some(state) = state {
            if !RATING_STATES.contains(&state.as_str()) {
                errors.add(field, "is not included in the list");
            }
        }
    }

    match &input.rating_overall_state {
        None => errors.add("rating_overall_state", "can't be blank"),
        Some(state) if !RATING_STATES.contains(&state.as_str()) => {
            errors.add("rating_overall_state", "is not included in the list");
        }
        Some(_) => {}
    }

    errors.into_result()
}

/// Offset for a 1-based page number. Pages below 1 clamp to the first page.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1) * per_page
}

/// A user's published reviews, newest first, optionally locale-filtered.
/// Returns the page of reviews plus the total matching count.
pub async fn list_published(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    locale: Option<Locale>,
    page: i64,
    per_page: i64,
) -> anyhow::Result<(Vec<Review>, i64)> {
    let mut query = reviews::table
        .filter(reviews::user_id.eq(user_id))
        .filter(reviews::published.eq(true))
        .into_boxed();
    let mut count_query = reviews::table
        .filter(reviews::user_id.eq(user_id))
        .filter(reviews::published.eq(true))
        .into_boxed();

    if let Some(locale) = locale {
        query = query.filter(reviews::locale.eq(locale.as_str()));
        count_query = count_query.filter(reviews::locale.eq(locale.as_str()));
    }

    let total: i64 = count_query.count().get_result(conn).await?;
    let items = query
        .order(reviews::created_at.desc())
        .limit(per_page)
        .offset(page_offset(page, per_page))
        .load::<Review>(conn)
        .await?;
    Ok((items, total))
}

/// Published reviews of a work, newest first.
pub async fn list_for_work(
    conn: &mut AsyncPgConnection,
    work_id: i64,
    page: i64,
    per_page: i64,
) -> anyhow::Result<(Vec<Review>, i64)> {
    let total: i64 = reviews::table
        .filter(reviews::work_id.eq(work_id))
        .filter(reviews::published.eq(true))
        .count()
        .get_result(conn)
        .await?;
    let items = reviews::table
        .filter(reviews::work_id.eq(work_id))
        .filter(reviews::published.eq(true))
        .order(reviews::created_at.desc())
        .limit(per_page)
        .offset(page_offset(page, per_page))
        .load::<Review>(conn)
        .await?;
    Ok((items, total))
}

/// A published review scoped to its author. Another user's id is a miss.
pub async fn find_published(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    review_id: i64,
) -> anyhow::Result<Option<Review>> {
    let result = reviews::table
        .find(review_id)
        .filter(reviews::user_id.eq(user_id))
        .filter(reviews::published.eq(true))
        .first::<Review>(conn)
        .await
        .optional()?;
    Ok(result)
}

/// The author's other published reviews, newest first.
pub async fn other_published(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    exclude_id: i64,
) -> anyhow::Result<Vec<Review>> {
    let results = reviews::table
        .filter(reviews::user_id.eq(user_id))
        .filter(reviews::published.eq(true))
        .filter(reviews::id.ne(exclude_id))
        .order(reviews::id.desc())
        .load::<Review>(conn)
        .await?;
    Ok(results)
}

/// Bump the impressions counter on a review show.
pub async fn increment_impressions(
    conn: &mut AsyncPgConnection,
    review_id: i64,
) -> anyhow::Result<()> {
    diesel::update(reviews::table.find(review_id))
        .set(reviews::impressions_count.eq(reviews::impressions_count + 1))
        .execute(conn)
        .await?;
    Ok(())
}

/// Create a review: insert it, bump the work's denormalized counter, and
/// apply the nested setting flags in one transaction.
pub async fn create_review(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    work_id: i64,
    input: ReviewInput,
    flags: ShareFlags,
) -> anyhow::Result<Review> {
    let new_review = NewReview {
        user_id,
        work_id,
        title: input.title.clone(),
        body: input.body.clone(),
        rating_animation_state: input.rating_animation_state.clone(),
        rating_music_state: input.rating_music_state.clone(),
        rating_story_state: input.rating_story_state.clone(),
        rating_character_state: input.rating_character_state.clone(),
        rating_overall_state: input
            .rating_overall_state
            .clone()
            .unwrap_or_else(|| "average".to_string()),
        locale: locale::detect_body_locale(&input.body).as_str().to_string(),
        published: true,
    };

    let review = conn
        .transaction::<Review, diesel::result::Error, _>(|conn| {
            async move {
                let review: Review = diesel::insert_into(reviews::table)
                    .values(&new_review)
                    .get_result(conn)
                    .await?;
                diesel::update(works::table.find(review.work_id))
                    .set(works::reviews_count.eq(works::reviews_count + 1))
                    .execute(conn)
                    .await?;
                apply_share_flags(conn, user_id, flags).await?;
                Ok(review)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(
        review_id = review.id,
        work_id = review.work_id,
        user_id = review.user_id,
        "Review created"
    );
    Ok(review)
}

/// Update a review and the author's setting flags atomically. Re-detects
/// the body locale and stamps `modified_at`.
pub async fn update_review(
    conn: &mut AsyncPgConnection,
    review_id: i64,
    user_id: i64,
    input: ReviewInput,
    flags: ShareFlags,
) -> anyhow::Result<Review> {
    let now = Utc::now();
    let changeset = ReviewChangeset {
        title: input.title.clone(),
        body: Some(input.body.clone()),
        rating_animation_state: input.rating_animation_state.clone(),
        rating_music_state: input.rating_music_state.clone(),
        rating_story_state: input.rating_story_state.clone(),
        rating_character_state: input.rating_character_state.clone(),
        rating_overall_state: input.rating_overall_state.clone(),
        locale: Some(locale::detect_body_locale(&input.body).as_str().to_string()),
        modified_at: Some(now),
        updated_at: Some(now),
    };

    let review = conn
        .transaction::<Review, diesel::result::Error, _>(|conn| {
            async move {
                let review: Review = diesel::update(reviews::table.find(review_id))
                    .set(&changeset)
                    .get_result(conn)
                    .await?;
                apply_share_flags(conn, user_id, flags).await?;
                Ok(review)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(review_id = review.id, "Review updated");
    Ok(review)
}

/// Delete a review and decrement the work's counter in one transaction.
pub async fn delete_review(conn: &mut AsyncPgConnection, review: &Review) -> anyhow::Result<()> {
    let review_id = review.id;
    let work_id = review.work_id;
    conn.transaction::<(), diesel::result::Error, _>(|conn| {
        async move {
            diesel::delete(reviews::table.find(review_id))
                .execute(conn)
                .await?;
            diesel::update(works::table.find(work_id))
                .set(works::reviews_count.eq(works::reviews_count - 1))
                .execute(conn)
                .await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    tracing::info!(review_id, work_id, "Review deleted");
    Ok(())
}

async fn apply_share_flags(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    flags: ShareFlags,
) -> Result<(), diesel::result::Error> {
    if flags.twitter.is_none() && flags.facebook.is_none() {
        return Ok(());
    }

    // First review may arrive before the settings row exists
    diesel::insert_into(user_settings::table)
        .values(&NewUserSetting {
            user_id,
            share_review_to_twitter: false,
            share_review_to_facebook: false,
            hide_review_bodies: false,
        })
        .on_conflict(user_settings::user_id)
        .do_nothing()
        .execute(conn)
        .await?;

    if let Some(twitter) = flags.twitter {
        diesel::update(user_settings::table.filter(user_settings::user_id.eq(user_id)))
            .set((
                user_settings::share_review_to_twitter.eq(twitter),
                user_settings::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
            .await?;
    }
    if let Some(facebook) = flags.facebook {
        diesel::update(user_settings::table.filter(user_settings::user_id.eq(user_id)))
            .set((
                user_settings::share_review_to_facebook.eq(facebook),
                user_settings::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ReviewInput {
        ReviewInput {
            title: Some("First impressions".to_string()),
            body: "A solid opening episode with strong animation.".to_string(),
            rating_animation_state: Some("great".to_string()),
            rating_music_state: None,
            rating_story_state: Some("good".to_string()),
            rating_character_state: None,
            rating_overall_state: Some("good".to_string()),
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate(&valid_input()).is_ok());
    }

    #[test]
    fn blank_body_is_rejected() {
        let mut input = valid_input();
        input.body = "   ".to_string();
        let errors = validate(&input).unwrap_err();
        assert!(errors.errors.iter().any(|e| e.field == "body"));
    }

    #[test]
    fn overlong_body_is_rejected() {
        let mut input = valid_input();
        input.body = "x".repeat(BODY_MAX + 1);
        let errors = validate(&input).unwrap_err();
        assert!(errors.errors.iter().any(|e| e.field == "body"));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut input = valid_input();
        input.title = Some("t".repeat(TITLE_MAX + 1));
        let errors = validate(&input).unwrap_err();
        assert!(errors.errors.iter().any(|e| e.field == "title"));
    }

    #[test]
    fn missing_overall_rating_is_rejected() {
        let mut input = valid_input();
        input.rating_overall_state = None;
        let errors = validate(&input).unwrap_err();
        assert!(errors
            .errors
            .iter()
            .any(|e| e.field == "rating_overall_state"));
    }

    #[test]
    fn unknown_rating_state_is_rejected() {
        let mut input = valid_input();
        input.rating_music_state = Some("amazing".to_string());
        let errors = validate(&input).unwrap_err();
        assert!(errors.errors.iter().any(|e| e.field == "rating_music_state"));
    }

    #[test]
    fn multiple_failures_are_all_reported() {
        let input = ReviewInput {
            body: String::new(),
            rating_overall_state: Some("meh".to_string()),
            ..Default::default()
        };
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.errors.len(), 2);
    }

    #[test]
    fn page_offset_clamps_to_first_page() {
        assert_eq!(page_offset(0, 30), 0);
        assert_eq!(page_offset(-3, 30), 0);
        assert_eq!(page_offset(1, 30), 0);
        assert_eq!(page_offset(3, 30), 60);
    }
}
