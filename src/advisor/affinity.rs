use crate::models::{NodeClaim, ReplicaRequirements, WorkloadSpec};

/// Resolves the affinity target a workload asked for, if any.
///
/// The primary replica requirements are checked first, then each component
/// in the order given. First match wins; conflicting hints across
/// components are not merged or validated.
pub fn detect_target_cluster(spec: Option<&WorkloadSpec>, label_key: &str) -> Option<String> {
    let spec = spec?;

    if let Some(target) = target_from_requirements(spec.replica_requirements.as_ref(), label_key) {
        return Some(target);
    }

    spec.components
        .iter()
        .find_map(|comp| target_from_requirements(comp.replica_requirements.as_ref(), label_key))
}

fn target_from_requirements(req: Option<&ReplicaRequirements>, label_key: &str) -> Option<String> {
    target_from_node_claim(req?.node_claim.as_ref(), label_key)
}

fn target_from_node_claim(claim: Option<&NodeClaim>, label_key: &str) -> Option<String> {
    claim?.node_selector.get(label_key).cloned()
}
