use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// --- Wire objects ---

/// Score response returned by the advisor service for a single cluster.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterScore {
    pub health_score: f64,
    /// Diagnostic explanation attached by the advisor, may be empty.
    #[serde(default)]
    pub reason: String,
}

// --- Workload objects ---

/// Placement requirements of the workload being scored.
///
/// Mirrors the binding spec handed over by the host scheduler: an optional
/// primary requirement plus per-component requirements.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    #[serde(default)]
    pub replica_requirements: Option<ReplicaRequirements>,
    #[serde(default)]
    pub components: Vec<ComponentRequirements>,
}

/// Scheduling requirements for a group of replicas.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaRequirements {
    #[serde(default)]
    pub node_claim: Option<NodeClaim>,
}

/// Requirements for a single named component of a workload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRequirements {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub replica_requirements: Option<ReplicaRequirements>,
}

/// Node selection constraints carried by replica requirements.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeClaim {
    #[serde(default)]
    pub node_selector: HashMap<String, String>,
}
