//! Work catalog lookups.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::work::Work;
use crate::schema::works;

/// Find a work by id.
pub async fn find(conn: &mut AsyncPgConnection, work_id: i64) -> anyhow::Result<Option<Work>> {
    let result = works::table
        .find(work_id)
        .first::<Work>(conn)
        .await
        .optional()?;
    Ok(result)
}

/// Load the works referenced by a page of reviews (the work-list payload).
pub async fn list_by_ids(
    conn: &mut AsyncPgConnection,
    ids: &[i64],
) -> anyhow::Result<Vec<Work>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let results = works::table
        .filter(works::id.eq_any(ids))
        .order(works::id.asc())
        .load::<Work>(conn)
        .await?;
    Ok(results)
}
