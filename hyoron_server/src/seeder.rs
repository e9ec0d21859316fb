//! Demo-data seeder — a small catalog plus demo accounts.
//!
//! Idempotent — uses ON CONFLICT DO NOTHING, so it is safe to run on
//! every startup with `--seed-demo`.

use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::routes::auth;

const DEMO_EDITOR_TOKEN: &str = "demo-editor-token";
const DEMO_USER_TOKEN: &str = "demo-user-token";

pub async fn seed_demo(conn: &mut AsyncPgConnection) -> anyhow::Result<()> {
    // ── Works ──
    let works: Vec<(&str, &str, &str)> = vec![
        ("Cosmic Drift", "コズミック・ドリフト", "tv"),
        ("Paper Lanterns", "ペーパー・ランタン", "movie"),
        ("Iron Harvest Season 2", "アイアン・ハーベスト", "tv"),
    ];

    for (title, title_kana, media) in &works {
        diesel::sql_query(format!(
            "INSERT INTO works (title, title_kana, media) \
             VALUES ('{title}', '{title_kana}', '{media}') \
             ON CONFLICT (title) DO NOTHING"
        ))
        .execute(conn)
        .await?;
    }

    // ── Demo accounts ──
    let accounts: Vec<(&str, &str, &str, &str)> = vec![
        ("demo_editor", "editor@hyoron.example", "editor", DEMO_EDITOR_TOKEN),
        ("demo_user", "user@hyoron.example", "user", DEMO_USER_TOKEN),
    ];

    for (username, email, role, token) in &accounts {
        let digest = auth::token_digest(token);
        diesel::sql_query(format!(
            "INSERT INTO users (username, email, role, api_token_digest) \
             VALUES ('{username}', '{email}', '{role}', '{digest}') \
             ON CONFLICT (username) DO NOTHING"
        ))
        .execute(conn)
        .await?;

        diesel::sql_query(format!(
            "INSERT INTO user_settings (user_id) \
             SELECT id FROM users WHERE username = '{username}' \
             ON CONFLICT (user_id) DO NOTHING"
        ))
        .execute(conn)
        .await?;
    }

    tracing::info!(
        "Seeded demo data: {} works, {} accounts (tokens: {DEMO_EDITOR_TOKEN}, {DEMO_USER_TOKEN})",
        works.len(),
        accounts.len()
    );
    Ok(())
}
