//! Bearer-token authentication and access policies.
//!
//! Tokens are opaque; the database stores the hex SHA-256 digest, so a
//! leaked table never exposes usable credentials.

use axum::http::HeaderMap;
use diesel_async::AsyncPgConnection;
use sha2::{Digest, Sha256};

use crate::models::review::Review;
use crate::models::user::User;
use crate::routes::error::ApiError;
use crate::services::user_service;

/// Hex SHA-256 digest of an API token.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// The token carried in `Authorization: Bearer <token>`, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the caller. Missing credentials are a 401.
pub async fn authenticate(
    conn: &mut AsyncPgConnection,
    headers: &HeaderMap,
) -> Result<User, ApiError> {
    maybe_authenticate(conn, headers)
        .await?
        .ok_or(ApiError::Unauthorized)
}

/// Resolve the caller if credentials were sent. No header means an
/// anonymous request; a present-but-unknown token is still a 401.
pub async fn maybe_authenticate(
    conn: &mut AsyncPgConnection,
    headers: &HeaderMap,
) -> Result<Option<User>, ApiError> {
    let token = match bearer_token(headers) {
        Some(t) => t,
        None => return Ok(None),
    };

    let digest = token_digest(token);
    let user = user_service::find_by_token_digest(conn, &digest)
        .await
        .map_err(ApiError::Internal)?;
    match user {
        Some(user) => Ok(Some(user)),
        None => Err(ApiError::Unauthorized),
    }
}

/// The `/db` catalog namespace is staff tooling.
pub fn authorize_staff(user: &User) -> Result<(), ApiError> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Only the author may edit, update, or destroy their review.
pub fn authorize_author(user: &User, review: &Review) -> Result<(), ApiError> {
    if review.user_id == user.id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;

    fn user_with_role(role: &str) -> User {
        User {
            id: 7,
            username: "akira".to_string(),
            email: "akira@example.com".to_string(),
            role: role.to_string(),
            api_token_digest: None,
            active: true,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn review_by(user_id: i64) -> Review {
        Review {
            id: 1,
            user_id,
            work_id: 1,
            title: None,
            body: "body".to_string(),
            rating_animation_state: None,
            rating_music_state: None,
            rating_story_state: None,
            rating_character_state: None,
            rating_overall_state: "good".to_string(),
            locale: "en".to_string(),
            published: true,
            impressions_count: 0,
            modified_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn token_digest_is_stable_hex_sha256() {
        let digest = token_digest("secret-token");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, token_digest("secret-token"));
        assert_ne!(digest, token_digest("other-token"));
    }

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert("authorization", HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn staff_policy_by_role() {
        assert!(authorize_staff(&user_with_role("editor")).is_ok());
        assert!(authorize_staff(&user_with_role("admin")).is_ok());
        assert!(authorize_staff(&user_with_role("user")).is_err());
    }

    #[test]
    fn author_policy_only_allows_owner() {
        let user = user_with_role("user");
        assert!(authorize_author(&user, &review_by(7)).is_ok());
        assert!(authorize_author(&user, &review_by(8)).is_err());
    }
}
