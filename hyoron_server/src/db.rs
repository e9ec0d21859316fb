//! Database pool and embedded schema migration.

use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConn = Object<AsyncPgConnection>;

/// Build the deadpool-backed diesel-async connection pool.
pub fn connect(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder(manager)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build database pool: {e}"))
}

/// SQL migration for the review platform tables.
///
/// Idempotent — CREATE TABLE IF NOT EXISTS throughout, so it runs on
/// every startup.
pub const MIGRATION_SQL: &str = r#"
-- ================================================================
-- Review Platform Tables
-- ================================================================

CREATE TABLE IF NOT EXISTS users (
    id               BIGSERIAL PRIMARY KEY,
    username         VARCHAR(40) NOT NULL UNIQUE,
    email            VARCHAR(255) NOT NULL UNIQUE,
    role             VARCHAR(16) NOT NULL DEFAULT 'user',
    api_token_digest VARCHAR(64) UNIQUE,
    active           BOOLEAN NOT NULL DEFAULT TRUE,
    created_at       TIMESTAMPTZ DEFAULT NOW(),
    updated_at       TIMESTAMPTZ DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_users_username ON users (username);
CREATE INDEX IF NOT EXISTS idx_users_token ON users (api_token_digest);

CREATE TABLE IF NOT EXISTS user_settings (
    id                       BIGSERIAL PRIMARY KEY,
    user_id                  BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    share_review_to_twitter  BOOLEAN NOT NULL DEFAULT FALSE,
    share_review_to_facebook BOOLEAN NOT NULL DEFAULT FALSE,
    hide_review_bodies       BOOLEAN NOT NULL DEFAULT FALSE,
    created_at               TIMESTAMPTZ DEFAULT NOW(),
    updated_at               TIMESTAMPTZ DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS works (
    id                BIGSERIAL PRIMARY KEY,
    title             VARCHAR(255) NOT NULL UNIQUE,
    title_kana        VARCHAR(255),
    media             VARCHAR(16) NOT NULL DEFAULT 'tv',
    image_url         VARCHAR(512),
    official_site_url VARCHAR(512),
    wikipedia_url     VARCHAR(512),
    reviews_count     INTEGER NOT NULL DEFAULT 0,
    created_at        TIMESTAMPTZ DEFAULT NOW(),
    updated_at        TIMESTAMPTZ DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS programs (
    id             BIGSERIAL PRIMARY KEY,
    work_id        BIGINT NOT NULL REFERENCES works(id) ON DELETE CASCADE,
    channel_id     BIGINT NOT NULL,
    episode_number INTEGER,
    started_at     TIMESTAMPTZ NOT NULL,
    created_at     TIMESTAMPTZ DEFAULT NOW(),
    updated_at     TIMESTAMPTZ DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_programs_work ON programs (work_id);
CREATE INDEX IF NOT EXISTS idx_programs_started ON programs (started_at);

CREATE TABLE IF NOT EXISTS reviews (
    id                     BIGSERIAL PRIMARY KEY,
    user_id                BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    work_id                BIGINT NOT NULL REFERENCES works(id) ON DELETE CASCADE,
    title                  VARCHAR(100),
    body                   TEXT NOT NULL,
    rating_animation_state VARCHAR(16),
    rating_music_state     VARCHAR(16),
    rating_story_state     VARCHAR(16),
    rating_character_state VARCHAR(16),
    rating_overall_state   VARCHAR(16) NOT NULL,
    locale                 VARCHAR(8) NOT NULL DEFAULT 'en',
    published              BOOLEAN NOT NULL DEFAULT TRUE,
    impressions_count      INTEGER NOT NULL DEFAULT 0,
    modified_at            TIMESTAMPTZ,
    created_at             TIMESTAMPTZ DEFAULT NOW(),
    updated_at             TIMESTAMPTZ DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews (user_id);
CREATE INDEX IF NOT EXISTS idx_reviews_work ON reviews (work_id);
CREATE INDEX IF NOT EXISTS idx_reviews_created ON reviews (created_at DESC);
CREATE INDEX IF NOT EXISTS idx_reviews_locale ON reviews (locale);

CREATE TABLE IF NOT EXISTS edit_requests (
    id         BIGSERIAL PRIMARY KEY,
    user_id    BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    work_id    BIGINT NOT NULL REFERENCES works(id) ON DELETE CASCADE,
    proposal   JSONB NOT NULL,
    comment    TEXT,
    status     VARCHAR(16) NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ DEFAULT NOW(),
    updated_at TIMESTAMPTZ DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_edit_requests_work ON edit_requests (work_id);
CREATE INDEX IF NOT EXISTS idx_edit_requests_status ON edit_requests (status);

CREATE TABLE IF NOT EXISTS share_jobs (
    id          BIGSERIAL PRIMARY KEY,
    user_id     BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    review_id   BIGINT NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
    provider    VARCHAR(16) NOT NULL,
    status      VARCHAR(16) NOT NULL DEFAULT 'pending',
    attempts    INTEGER NOT NULL DEFAULT 0,
    last_error  TEXT,
    created_at  TIMESTAMPTZ DEFAULT NOW(),
    finished_at TIMESTAMPTZ
);

CREATE INDEX IF NOT EXISTS idx_share_jobs_status ON share_jobs (status);
CREATE INDEX IF NOT EXISTS idx_share_jobs_review ON share_jobs (review_id);
"#;

/// Run the platform migration.
pub async fn run_migration(conn: &mut AsyncPgConnection) -> anyhow::Result<()> {
    conn.batch_execute(MIGRATION_SQL)
        .await
        .map_err(|e| anyhow::anyhow!("migration failed: {e}"))?;
    Ok(())
}
