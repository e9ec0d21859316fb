//! EditRequest — a user-submitted proposal to modify a Work's metadata.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::edit_requests;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = edit_requests)]
pub struct EditRequest {
    pub id: i64,
    pub user_id: i64,
    pub work_id: i64,
    pub proposal: serde_json::Value,
    pub comment: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = edit_requests)]
pub struct NewEditRequest {
    pub user_id: i64,
    pub work_id: i64,
    pub proposal: serde_json::Value,
    pub comment: Option<String>,
    pub status: String,
}

/// Partial update for an edit request. The requester never changes.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = edit_requests)]
pub struct EditRequestChangeset {
    pub proposal: Option<serde_json::Value>,
    pub comment: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
