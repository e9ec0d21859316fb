//! Work — a catalog entry for a creative work (anime/media title).

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::works;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = works)]
pub struct Work {
    pub id: i64,
    pub title: String,
    pub title_kana: Option<String>,
    pub media: String,
    pub image_url: Option<String>,
    pub official_site_url: Option<String>,
    pub wikipedia_url: Option<String>,
    pub reviews_count: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = works)]
pub struct NewWork {
    pub title: String,
    pub title_kana: Option<String>,
    pub media: String,
    pub image_url: Option<String>,
    pub official_site_url: Option<String>,
    pub wikipedia_url: Option<String>,
}
