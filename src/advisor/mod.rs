//! # Global Advisor plugin
//!
//! Scores candidate clusters by consulting an external advisory service.
//! A TTL cache shields the scheduler's hot path from repeated network
//! calls, and any fetch failure degrades to a configured default score so
//! the scheduling pass always makes progress.

pub mod affinity;
pub mod cache;
pub mod client;
pub mod errors;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    models::WorkloadSpec,
    plugin::{Outcome, ScorePlugin},
};
use affinity::detect_target_cluster;
use cache::{ScoreCache, ScoreStore};
use client::ScoreClient;
use errors::ClientError;

/// Name the plugin registers under.
pub const NAME: &str = "GlobalAdvisor";

/// Score plugin backed by the global advisor service.
pub struct GlobalAdvisor {
    client: ScoreClient,
    cache: Arc<dyn ScoreStore>,
    config: Config,
}

impl GlobalAdvisor {
    /// Creates the plugin from an explicit configuration.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        tracing::info!(url=%config.base_url, "Connecting to global advisor");

        let client = ScoreClient::new(&config)?;
        let cache = Arc::new(ScoreCache::new(config.cache_ttl));

        Ok(GlobalAdvisor {
            client,
            cache,
            config,
        })
    }

    /// Creates the plugin from environment variables, the way the host
    /// scheduler registry instantiates plugins.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(Config::from_env())
    }

    #[cfg(test)]
    fn with_cache(config: Config, cache: Arc<dyn ScoreStore>) -> Result<Self, ClientError> {
        let client = ScoreClient::new(&config)?;
        Ok(GlobalAdvisor {
            client,
            cache,
            config,
        })
    }
}

#[async_trait]
impl ScorePlugin for GlobalAdvisor {
    fn name(&self) -> &'static str {
        NAME
    }

    /// Scores one candidate cluster.
    ///
    /// Never fails outward: any fetch error is absorbed into the default
    /// score so the scheduling pass keeps moving.
    async fn score(
        &self,
        cancel: &CancellationToken,
        spec: Option<&WorkloadSpec>,
        cluster_name: &str,
    ) -> (i64, Outcome) {
        let mut target = detect_target_cluster(spec, &self.config.affinity_label_key);
        if target.is_none() {
            target = self.config.test_affinity_target.clone();
        }

        tracing::debug!(cluster=%cluster_name, target=?target, "Score called");

        // A score biased toward a target is no substitute for the unbiased
        // per-cluster cache, so targeted calls skip the cache entirely,
        // reads and writes both.
        if target.is_none() {
            if let Some(score) = self.cache.get(cluster_name) {
                return (score as i64, Outcome::Success);
            }
        }

        // Bound the fetch below the caller's own deadline so worst-case
        // scoring latency stays fixed however generous the caller is.
        let fetch = self
            .client
            .get_score(cancel, cluster_name, target.as_deref());
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            fetched = timeout(self.config.timeout, fetch) => match fetched {
                Ok(inner) => inner,
                Err(_) => Err(ClientError::Transport("score call timed out".to_string())),
            },
        };

        let resp = match result {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(cluster=%cluster_name, error=%err, "Failed to get score, using default");
                return (self.config.default_score as i64, Outcome::Success);
            }
        };

        let score = resp.health_score.clamp(0.0, 100.0);

        // only unbiased results feed the cache
        if target.is_none() {
            self.cache.set(cluster_name, score);
        }

        tracing::info!(cluster=%cluster_name, score, reason=%resp.reason, "Got advisor score");
        (score as i64, Outcome::Success)
    }
}
