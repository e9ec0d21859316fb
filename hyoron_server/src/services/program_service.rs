//! Broadcast schedule CRUD, scoped to a work.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::program::{NewProgram, Program, ProgramChangeset};
use crate::schema::programs;
use crate::services::ValidationErrors;

/// Attributes accepted for program creation.
#[derive(Debug, Clone)]
pub struct ProgramInput {
    pub channel_id: i64,
    pub episode_number: Option<i32>,
    pub started_at: DateTime<Utc>,
}

/// Attributes accepted for program update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProgramUpdate {
    pub channel_id: Option<i64>,
    pub episode_number: Option<i32>,
    pub started_at: Option<DateTime<Utc>>,
}

pub fn validate(input: &ProgramInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if input.channel_id <= 0 {
        errors.add("channel_id", "must be a positive id");
    }
    if let Some(ep) = input.episode_number {
        if ep <= 0 {
            errors.add("episode_number", "must be greater than 0");
        }
    }
    errors.into_result()
}

pub fn validate_update(update: &ProgramUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(channel_id) = update.channel_id {
        if channel_id <= 0 {
            errors.add("channel_id", "must be a positive id");
        }
    }
    if let Some(ep) = update.episode_number {
        if ep <= 0 {
            errors.add("episode_number", "must be greater than 0");
        }
    }
    errors.into_result()
}

/// A work's programs, ordered by airing time then channel.
pub async fn list_for_work(
    conn: &mut AsyncPgConnection,
    work_id: i64,
) -> anyhow::Result<Vec<Program>> {
    let results = programs::table
        .filter(programs::work_id.eq(work_id))
        .order((programs::started_at.asc(), programs::channel_id.asc()))
        .load::<Program>(conn)
        .await?;
    Ok(results)
}

/// A program scoped to its work. An id under another work is a miss.
pub async fn find_in_work(
    conn: &mut AsyncPgConnection,
    work_id: i64,
    program_id: i64,
) -> anyhow::Result<Option<Program>> {
    let result = programs::table
        .find(program_id)
        .filter(programs::work_id.eq(work_id))
        .first::<Program>(conn)
        .await
        .optional()?;
    Ok(result)
}

pub async fn create_program(
    conn: &mut AsyncPgConnection,
    work_id: i64,
    input: ProgramInput,
) -> anyhow::Result<Program> {
    let new_program = NewProgram {
        work_id,
        channel_id: input.channel_id,
        episode_number: input.episode_number,
        started_at: input.started_at,
    };
    let program = diesel::insert_into(programs::table)
        .values(&new_program)
        .get_result::<Program>(conn)
        .await?;

    tracing::info!(program_id = program.id, work_id, "Program created");
    Ok(program)
}

pub async fn update_program(
    conn: &mut AsyncPgConnection,
    program_id: i64,
    update: ProgramUpdate,
) -> anyhow::Result<Program> {
    let changeset = ProgramChangeset {
        channel_id: update.channel_id,
        episode_number: update.episode_number,
        started_at: update.started_at,
        updated_at: Some(Utc::now()),
    };
    let program = diesel::update(programs::table.find(program_id))
        .set(&changeset)
        .get_result::<Program>(conn)
        .await?;

    tracing::info!(program_id = program.id, "Program updated");
    Ok(program)
}

pub async fn delete_program(conn: &mut AsyncPgConnection, program_id: i64) -> anyhow::Result<()> {
    diesel::delete(programs::table.find(program_id))
        .execute(conn)
        .await?;
    tracing::info!(program_id, "Program deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_program_passes() {
        let input = ProgramInput {
            channel_id: 12,
            episode_number: Some(3),
            started_at: Utc::now(),
        };
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn non_positive_channel_is_rejected() {
        let input = ProgramInput {
            channel_id: 0,
            episode_number: None,
            started_at: Utc::now(),
        };
        let errors = validate(&input).unwrap_err();
        assert!(errors.errors.iter().any(|e| e.field == "channel_id"));
    }

    #[test]
    fn non_positive_episode_is_rejected() {
        let input = ProgramInput {
            channel_id: 1,
            episode_number: Some(0),
            started_at: Utc::now(),
        };
        assert!(validate(&input).is_err());
    }

    #[test]
    fn empty_update_passes() {
        assert!(validate_update(&ProgramUpdate::default()).is_ok());
    }

    #[test]
    fn bad_update_channel_is_rejected() {
        let update = ProgramUpdate {
            channel_id: Some(-1),
            ..Default::default()
        };
        assert!(validate_update(&update).is_err());
    }
}
