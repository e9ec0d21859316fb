//! ShareJob — a queued social-sharing delivery for a review.
//!
//! Rows are written by the request path and picked up by the background
//! worker. `provider` is `twitter` or `facebook`; `status` moves through
//! `pending` → `delivering` → `delivered` / `failed` / `skipped`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::share_jobs;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = share_jobs)]
pub struct ShareJob {
    pub id: i64,
    pub user_id: i64,
    pub review_id: i64,
    pub provider: String,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = share_jobs)]
pub struct NewShareJob {
    pub user_id: i64,
    pub review_id: i64,
    pub provider: String,
    pub status: String,
}
