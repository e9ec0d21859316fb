//! Program — a scheduled broadcast airing tied to a Work.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::programs;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = programs)]
pub struct Program {
    pub id: i64,
    pub work_id: i64,
    pub channel_id: i64,
    pub episode_number: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = programs)]
pub struct NewProgram {
    pub work_id: i64,
    pub channel_id: i64,
    pub episode_number: Option<i32>,
    pub started_at: DateTime<Utc>,
}

/// Partial update for a program. `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = programs)]
pub struct ProgramChangeset {
    pub channel_id: Option<i64>,
    pub episode_number: Option<i32>,
    pub started_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
