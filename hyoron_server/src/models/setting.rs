//! UserSetting — per-user sharing and display preferences.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::user_settings;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = user_settings)]
pub struct UserSetting {
    pub id: i64,
    pub user_id: i64,
    pub share_review_to_twitter: bool,
    pub share_review_to_facebook: bool,
    pub hide_review_bodies: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_settings)]
pub struct NewUserSetting {
    pub user_id: i64,
    pub share_review_to_twitter: bool,
    pub share_review_to_facebook: bool,
    pub hide_review_bodies: bool,
}
