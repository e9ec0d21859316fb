//! Catalog edit request CRUD and proposal validation.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::edit_request::{EditRequest, EditRequestChangeset, NewEditRequest};
use crate::schema::edit_requests;
use crate::services::ValidationErrors;

/// Work metadata fields a proposal may touch.
pub const EDITABLE_FIELDS: [&str; 6] = [
    "title",
    "title_kana",
    "media",
    "image_url",
    "official_site_url",
    "wikipedia_url",
];

const COMMENT_MAX: usize = 1_000;

/// Validate a proposal payload: a non-empty JSON object whose keys are all
/// editable work fields.
pub fn validate(proposal: &serde_json::Value, comment: Option<&str>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match proposal.as_object() {
        None => errors.add("proposal", "must be a JSON object"),
        Some(map) if map.is_empty() => errors.add("proposal", "can't be blank"),
        Some(map) => {
            for key in map.keys() {
                if !EDITABLE_FIELDS.contains(&key.as_str()) {
                    errors.add("proposal", format!("unknown field: {key}"));
                }
            }
        }
    }

    if let Some(comment) = comment {
        if comment.chars().count() > COMMENT_MAX {
            errors.add(
                "comment",
                format!("is too long (maximum is {COMMENT_MAX} characters)"),
            );
        }
    }

    errors.into_result()
}

/// Validate a partial update. The proposal is only checked when supplied.
pub fn validate_update(
    proposal: Option<&serde_json::Value>,
    comment: Option<&str>,
) -> Result<(), ValidationErrors> {
    match proposal {
        Some(proposal) => validate(proposal, comment),
        None => {
            let mut errors = ValidationErrors::new();
            if let Some(comment) = comment {
                if comment.chars().count() > COMMENT_MAX {
                    errors.add(
                        "comment",
                        format!("is too long (maximum is {COMMENT_MAX} characters)"),
                    );
                }
            }
            errors.into_result()
        }
    }
}

pub async fn find(
    conn: &mut AsyncPgConnection,
    edit_request_id: i64,
) -> anyhow::Result<Option<EditRequest>> {
    let result = edit_requests::table
        .find(edit_request_id)
        .first::<EditRequest>(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn create_edit_request(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    work_id: i64,
    proposal: serde_json::Value,
    comment: Option<String>,
) -> anyhow::Result<EditRequest> {
    let new_request = NewEditRequest {
        user_id,
        work_id,
        proposal,
        comment,
        status: "pending".to_string(),
    };
    let edit_request = diesel::insert_into(edit_requests::table)
        .values(&new_request)
        .get_result::<EditRequest>(conn)
        .await?;

    tracing::info!(
        edit_request_id = edit_request.id,
        work_id,
        user_id,
        "Edit request created"
    );
    Ok(edit_request)
}

/// Update the proposed payload/comment. The original requester stays owner.
pub async fn update_edit_request(
    conn: &mut AsyncPgConnection,
    edit_request_id: i64,
    proposal: Option<serde_json::Value>,
    comment: Option<String>,
) -> anyhow::Result<EditRequest> {
    let changeset = EditRequestChangeset {
        proposal,
        comment,
        updated_at: Some(Utc::now()),
    };
    let edit_request = diesel::update(edit_requests::table.find(edit_request_id))
        .set(&changeset)
        .get_result::<EditRequest>(conn)
        .await?;

    tracing::info!(edit_request_id = edit_request.id, "Edit request updated");
    Ok(edit_request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_with_editable_fields_passes() {
        let proposal = json!({"title": "New Title", "media": "movie"});
        assert!(validate(&proposal, Some("fixing the title")).is_ok());
    }

    #[test]
    fn empty_object_is_rejected() {
        let errors = validate(&json!({}), None).unwrap_err();
        assert!(errors.errors.iter().any(|e| e.field == "proposal"));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(validate(&json!("title"), None).is_err());
        assert!(validate(&json!(["title"]), None).is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let errors = validate(&json!({"episodes": 12}), None).unwrap_err();
        assert!(errors
            .errors
            .iter()
            .any(|e| e.message.contains("episodes")));
    }

    #[test]
    fn overlong_comment_is_rejected() {
        let long = "c".repeat(COMMENT_MAX + 1);
        let errors = validate(&json!({"title": "x"}), Some(&long)).unwrap_err();
        assert!(errors.errors.iter().any(|e| e.field == "comment"));
    }
}
