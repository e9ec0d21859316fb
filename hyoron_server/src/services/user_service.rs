//! User lookup and per-user settings access.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::setting::{NewUserSetting, UserSetting};
use crate::models::user::User;
use crate::schema::{user_settings, users};

/// Find an active user by username.
pub async fn find_by_username(
    conn: &mut AsyncPgConnection,
    username: &str,
) -> anyhow::Result<Option<User>> {
    let result = users::table
        .filter(users::username.eq(username))
        .filter(users::active.eq(true))
        .first::<User>(conn)
        .await
        .optional()?;
    Ok(result)
}

/// Find an active user by the digest of their API token.
pub async fn find_by_token_digest(
    conn: &mut AsyncPgConnection,
    digest: &str,
) -> anyhow::Result<Option<User>> {
    let result = users::table
        .filter(users::api_token_digest.eq(digest))
        .filter(users::active.eq(true))
        .first::<User>(conn)
        .await
        .optional()?;
    Ok(result)
}

/// Load a user's settings, creating the default row on first access.
pub async fn setting_for(
    conn: &mut AsyncPgConnection,
    user_id: i64,
) -> anyhow::Result<UserSetting> {
    let existing = user_settings::table
        .filter(user_settings::user_id.eq(user_id))
        .first::<UserSetting>(conn)
        .await
        .optional()?;

    if let Some(setting) = existing {
        return Ok(setting);
    }

    let created = diesel::insert_into(user_settings::table)
        .values(&NewUserSetting {
            user_id,
            share_review_to_twitter: false,
            share_review_to_facebook: false,
            hide_review_bodies: false,
        })
        .get_result::<UserSetting>(conn)
        .await?;
    Ok(created)
}
