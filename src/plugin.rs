use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::models::WorkloadSpec;

/// Result of a scoring pass reported back to the host scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success,
    Error(String),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// A scoring extension the host scheduler calls once per
/// (workload, candidate cluster) pair.
///
/// Calls may run concurrently across scheduler workers with no ordering
/// guarantee, so implementations must be safe to share.
#[async_trait]
pub trait ScorePlugin: Send + Sync {
    /// Name the plugin registers under.
    fn name(&self) -> &'static str;

    /// Scores a candidate cluster for the given workload.
    ///
    /// `cancel` is the caller's cancellation context; implementations
    /// bound their own work below it.
    async fn score(
        &self,
        cancel: &CancellationToken,
        spec: Option<&WorkloadSpec>,
        cluster_name: &str,
    ) -> (i64, Outcome);

    /// Post-scoring normalization hook.
    ///
    /// Scores from this plugin are already bounded to [0, 100], so the
    /// default is a no-op.
    fn normalize_scores(&self, _scores: &mut [(String, i64)]) -> Outcome {
        Outcome::Success
    }
}
