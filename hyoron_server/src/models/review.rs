//! Review — a user-authored rating/commentary record tied to a Work.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::reviews;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = reviews)]
pub struct Review {
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
    pub published: bool,
    pub impressions_count: i32,
    pub modified_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReview {
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
    pub published: bool,
}

/// Partial update for a review. `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = reviews)]
pub struct ReviewChangeset {
    pub title: Option<String>,
    pub body: Option<String>,
    pub rating_animation_state: Option<String>,
    pub rating_music_state: Option<String>,
    pub rating_story_state: Option<String>,
    pub rating_character_state: Option<String>,
    pub rating_overall_state: Option<String>,
    pub locale: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
