use std::{env, time::Duration};

/// Well-known label key marking an affinity target inside workload
/// requirements.
pub const AFFINITY_LABEL_KEY: &str = "scheduler.qinhan.io/affinity-target";

/// Advisor plugin configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the global advisor service.
    pub base_url: String,
    /// Overall budget for one scoring call, retries included.
    pub timeout: Duration,
    /// Time allowed to establish a new connection, separate from `timeout`.
    pub connect_timeout: Duration,
    /// Extra attempts after the first failed one.
    pub retry: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
    /// Maximum age of a cached score.
    pub cache_ttl: Duration,
    /// Score substituted when the advisor cannot be reached.
    pub default_score: f64,
    /// Label key looked up when resolving the affinity target.
    pub affinity_label_key: String,
    /// Test-only affinity target applied when the workload carries none.
    pub test_affinity_target: Option<String>,
}

impl Config {
    /// Loads plugin configuration from environment variables.
    ///
    /// Falls back to defaults when applicable.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(url) = env::var("GLOBAL_SCHEDULER_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }

        if let Some(ms) = env::var("GS_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_millis(ms);
        }

        if let Some(val) = env::var("GS_RETRY").ok().and_then(|s| s.parse().ok()) {
            config.retry = val;
        }

        if let Some(ms) = env::var("GS_BACKOFF_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.backoff = Duration::from_millis(ms);
        }

        if let Some(ms) = env::var("GS_CACHE_TTL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.cache_ttl = Duration::from_millis(ms);
        }

        if let Some(val) = env::var("GS_DEFAULT_SCORE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.default_score = val;
        }

        if let Some(target) = env::var("TEST_AFFINITY_TARGET")
            .ok()
            .filter(|t| !t.is_empty())
        {
            config.test_affinity_target = Some(target);
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8088".to_string(),
            timeout: Duration::from_millis(300),
            connect_timeout: Duration::from_secs(3),
            retry: 1,
            backoff: Duration::from_millis(100),
            cache_ttl: Duration::from_secs(3),
            default_score: 50.0,
            affinity_label_key: AFFINITY_LABEL_KEY.to_string(),
            test_affinity_target: None,
        }
    }
}
