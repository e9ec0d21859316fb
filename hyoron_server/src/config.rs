//! Platform configuration — loaded from environment variables.

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL used when building share-post links.
    pub site_url: String,
    /// Twitter API endpoint for posting tweets.
    pub twitter_api_url: String,
    /// Twitter bearer token. Empty disables Twitter delivery.
    pub twitter_token: String,
    /// Facebook Graph API endpoint for feed posts.
    pub facebook_api_url: String,
    /// Facebook access token. Empty disables Facebook delivery.
    pub facebook_token: String,
    /// Seconds between share-worker polls.
    pub job_poll_secs: u64,
    /// Delivery attempts before a share job is marked failed.
    pub share_max_attempts: i32,
    /// Reviews per page on index listings.
    pub per_page: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let site_url = std::env::var("HYORON_SITE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let twitter_api_url = std::env::var("HYORON_TWITTER_API_URL")
            .unwrap_or_else(|_| "https://api.twitter.com/2/tweets".to_string());
        let twitter_token = std::env::var("HYORON_TWITTER_TOKEN").unwrap_or_default();
        let facebook_api_url = std::env::var("HYORON_FACEBOOK_API_URL")
            .unwrap_or_else(|_| "https://graph.facebook.com/v19.0/me/feed".to_string());
        let facebook_token = std::env::var("HYORON_FACEBOOK_TOKEN").unwrap_or_default();
        let job_poll_secs = std::env::var("HYORON_JOB_POLL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);
        let share_max_attempts = std::env::var("HYORON_SHARE_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);
        let per_page = std::env::var("HYORON_PER_PAGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        if twitter_token.is_empty() {
            tracing::warn!("HYORON_TWITTER_TOKEN not set -- Twitter share delivery disabled");
        }
        if facebook_token.is_empty() {
            tracing::warn!("HYORON_FACEBOOK_TOKEN not set -- Facebook share delivery disabled");
        }

        Self {
            site_url,
            twitter_api_url,
            twitter_token,
            facebook_api_url,
            facebook_token,
            job_poll_secs,
            share_max_attempts,
            per_page,
        }
    }
}
