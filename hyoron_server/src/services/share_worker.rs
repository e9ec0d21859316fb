//! Share worker — background task that polls for pending share jobs and
//! delivers them.
//!
//! Picks up `status = 'pending'` jobs oldest-first, marks them
//! `delivering`, posts to the provider API, and records the terminal
//! status. Spawned as a background tokio task.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::models::review::Review;
use crate::models::share_job::ShareJob;
use crate::models::user::User;
use crate::models::work::Work;
use crate::schema::{reviews, share_jobs, users, works};
use crate::services::share_service::{self, DeliveryOutcome, Provider};

/// Run the worker loop forever.
pub async fn run_worker(pool: DbPool, config: AppConfig) {
    tracing::info!(
        poll_secs = config.job_poll_secs,
        max_attempts = config.share_max_attempts,
        "Share worker started"
    );

    loop {
        if let Err(e) = poll_and_deliver(&pool, &config).await {
            tracing::error!("Share worker poll error: {e}");
        }
        tokio::time::sleep(std::time::Duration::from_secs(config.job_poll_secs)).await;
    }
}

/// Poll for one pending job and deliver it.
async fn poll_and_deliver(pool: &DbPool, config: &AppConfig) -> anyhow::Result<()> {
    let mut conn = pool
        .get()
        .await
        .map_err(|e| anyhow::anyhow!("db pool: {e}"))?;

    // Pick the oldest pending job
    let job: Option<ShareJob> = share_jobs::table
        .filter(share_jobs::status.eq("pending"))
        .order(share_jobs::id.asc())
        .first(&mut conn)
        .await
        .optional()?;

    let job = match job {
        Some(j) => j,
        None => return Ok(()),
    };

    // Claim it
    diesel::update(share_jobs::table.find(job.id))
        .set((
            share_jobs::status.eq("delivering"),
            share_jobs::attempts.eq(share_jobs::attempts + 1),
        ))
        .execute(&mut conn)
        .await?;
    let attempt = job.attempts + 1;

    let provider = match Provider::parse(&job.provider) {
        Some(p) => p,
        None => {
            tracing::error!(job_id = job.id, provider = %job.provider, "Unknown share provider");
            finish_job(&mut conn, &job, "failed", Some("unknown provider")).await?;
            return Ok(());
        }
    };

    // The review may have been deleted since the job was enqueued
    let review: Option<Review> = reviews::table
        .find(job.review_id)
        .first(&mut conn)
        .await
        .optional()?;
    let review = match review {
        Some(r) => r,
        None => {
            tracing::info!(job_id = job.id, "Review gone, skipping share job");
            finish_job(&mut conn, &job, "skipped", Some("review deleted")).await?;
            return Ok(());
        }
    };

    let user: User = users::table.find(job.user_id).first(&mut conn).await?;
    let work: Work = works::table.find(review.work_id).first(&mut conn).await?;

    tracing::info!(
        job_id = job.id,
        review_id = review.id,
        provider = provider.as_str(),
        attempt,
        "Delivering share job"
    );

    let message = share_service::share_message(&config.site_url, &user.username, &work.title, review.id);

    match share_service::deliver(config, provider, &message).await {
        Ok(DeliveryOutcome::Delivered) => {
            finish_job(&mut conn, &job, "delivered", None).await?;
        }
        Ok(DeliveryOutcome::Skipped) => {
            finish_job(&mut conn, &job, "skipped", None).await?;
        }
        Err(e) => {
            if attempt >= config.share_max_attempts {
                tracing::warn!(job_id = job.id, attempt, "Share delivery failed permanently: {e}");
                finish_job(&mut conn, &job, "failed", Some(&e.to_string())).await?;
            } else {
                tracing::warn!(job_id = job.id, attempt, "Share delivery failed, will retry: {e}");
                diesel::update(share_jobs::table.find(job.id))
                    .set((
                        share_jobs::status.eq("pending"),
                        share_jobs::last_error.eq(e.to_string()),
                    ))
                    .execute(&mut conn)
                    .await?;
            }
        }
    }

    Ok(())
}

async fn finish_job(
    conn: &mut AsyncPgConnection,
    job: &ShareJob,
    status: &str,
    last_error: Option<&str>,
) -> anyhow::Result<()> {
    diesel::update(share_jobs::table.find(job.id))
        .set((
            share_jobs::status.eq(status),
            share_jobs::last_error.eq(last_error),
            share_jobs::finished_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?;

    crate::metrics::share_job_finished(&job.provider, status);
    Ok(())
}
