use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{DiscoveryFilters, SwipeAction};

/// Request to score one profile against another
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompatibilityRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "viewer_id", rename = "viewerId")]
    pub viewer_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "candidate_id", rename = "candidateId")]
    pub candidate_id: String,
}

/// Request to build a discovery feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiscoverRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "viewer_id", rename = "viewerId")]
    pub viewer_id: String,
    #[serde(default)]
    pub filters: DiscoveryFilters,
    /// Falls back to the configured default limit
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
    #[serde(default)]
    #[serde(alias = "exclude_ids", rename = "excludeIds")]
    pub exclude_ids: Vec<String>,
}

/// Request to record a swipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "actor_id", rename = "actorId")]
    pub actor_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_id", rename = "targetId")]
    pub target_id: String,
    pub action: SwipeAction,
}
