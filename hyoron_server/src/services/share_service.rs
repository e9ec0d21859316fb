//! Social sharing — job enqueueing and outbound delivery.

use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::config::AppConfig;
use crate::models::setting::UserSetting;
use crate::models::share_job::NewShareJob;
use crate::schema::share_jobs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Twitter,
    Facebook,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Twitter => "twitter",
            Provider::Facebook => "facebook",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "twitter" => Some(Provider::Twitter),
            "facebook" => Some(Provider::Facebook),
            _ => None,
        }
    }
}

/// Outcome of a delivery attempt that did not error.
#[derive(Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Credentials absent; nothing was sent.
    Skipped,
}

/// The providers to share to for a given setting: one job per enabled flag,
/// none otherwise.
pub fn providers_for(setting: &UserSetting) -> Vec<Provider> {
    let mut providers = Vec::new();
    if setting.share_review_to_twitter {
        providers.push(Provider::Twitter);
    }
    if setting.share_review_to_facebook {
        providers.push(Provider::Facebook);
    }
    providers
}

/// Enqueue share jobs for a review per the author's settings. Returns the
/// number of jobs written.
pub async fn enqueue_for_review(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    review_id: i64,
    setting: &UserSetting,
) -> anyhow::Result<usize> {
    let providers = providers_for(setting);
    for provider in &providers {
        diesel::insert_into(share_jobs::table)
            .values(&NewShareJob {
                user_id,
                review_id,
                provider: provider.as_str().to_string(),
                status: "pending".to_string(),
            })
            .execute(conn)
            .await?;
        crate::metrics::share_job_enqueued(provider.as_str());
        tracing::info!(review_id, provider = provider.as_str(), "Share job enqueued");
    }
    Ok(providers.len())
}

/// The post text for a shared review.
pub fn share_message(site_url: &str, username: &str, work_title: &str, review_id: i64) -> String {
    format!("Reviewed {work_title} — {site_url}/users/{username}/reviews/{review_id}")
}

/// Deliver a share post to the provider's API.
pub async fn deliver(
    config: &AppConfig,
    provider: Provider,
    message: &str,
) -> anyhow::Result<DeliveryOutcome> {
    match provider {
        Provider::Twitter => deliver_twitter(config, message).await,
        Provider::Facebook => deliver_facebook(config, message).await,
    }
}

async fn deliver_twitter(config: &AppConfig, message: &str) -> anyhow::Result<DeliveryOutcome> {
    if config.twitter_token.is_empty() {
        tracing::debug!("Twitter token not set, skipping share delivery");
        return Ok(DeliveryOutcome::Skipped);
    }

    let body = serde_json::json!({ "text": message });
    let client = reqwest::Client::new();
    let resp = client
        .post(&config.twitter_api_url)
        .header("Authorization", format!("Bearer {}", config.twitter_token))
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("Twitter share failed: {status} {text}");
    }
    Ok(DeliveryOutcome::Delivered)
}

async fn deliver_facebook(config: &AppConfig, message: &str) -> anyhow::Result<DeliveryOutcome> {
    if config.facebook_token.is_empty() {
        tracing::debug!("Facebook token not set, skipping share delivery");
        return Ok(DeliveryOutcome::Skipped);
    }

    let body = serde_json::json!({
        "message": message,
        "access_token": config.facebook_token,
    });
    let client = reqwest::Client::new();
    let resp = client.post(&config.facebook_api_url).json(&body).send().await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("Facebook share failed: {status} {text}");
    }
    Ok(DeliveryOutcome::Delivered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(twitter: bool, facebook: bool) -> UserSetting {
        UserSetting {
            id: 1,
            user_id: 1,
            share_review_to_twitter: twitter,
            share_review_to_facebook: facebook,
            hide_review_bodies: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn no_flags_enqueues_nothing() {
        assert!(providers_for(&setting(false, false)).is_empty());
    }

    #[test]
    fn each_flag_maps_to_its_provider() {
        assert_eq!(providers_for(&setting(true, false)), vec![Provider::Twitter]);
        assert_eq!(providers_for(&setting(false, true)), vec![Provider::Facebook]);
        assert_eq!(
            providers_for(&setting(true, true)),
            vec![Provider::Twitter, Provider::Facebook]
        );
    }

    #[test]
    fn provider_round_trips_through_strings() {
        assert_eq!(Provider::parse("twitter"), Some(Provider::Twitter));
        assert_eq!(Provider::parse("facebook"), Some(Provider::Facebook));
        assert_eq!(Provider::parse("myspace"), None);
    }

    #[test]
    fn share_message_contains_canonical_path() {
        let msg = share_message("https://hyoron.example", "akira", "Cosmic Drift", 42);
        assert!(msg.contains("Cosmic Drift"));
        assert!(msg.contains("https://hyoron.example/users/akira/reviews/42"));
    }
}
