//! User — an account that writes reviews and edit requests.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::users;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub api_token_digest: Option<String>,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Staff accounts may manage the `/db` catalog namespace.
    pub fn is_staff(&self) -> bool {
        self.role == "editor" || self.role == "admin"
    }
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: String,
    pub api_token_digest: Option<String>,
    pub active: bool,
}
