use serde::{Deserialize, Serialize};

use crate::models::domain::{MutualMatch, RankedCandidate, ScoringWeights, SwipeRecord};

/// Response for the discover endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverResponse {
    pub feed: Vec<RankedCandidate>,
    pub total_eligible: usize,
    pub has_more: bool,
}

/// Response for the swipe endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub swipe: SwipeRecord,
    pub is_mutual: bool,
    #[serde(rename = "match")]
    pub mutual_match: Option<MutualMatch>,
    pub newly_matched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesResponse {
    pub user_id: String,
    pub matches: Vec<MutualMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeHistoryResponse {
    pub actor_id: String,
    pub swipes: Vec<SwipeRecord>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsResponse {
    pub weights: ScoringWeights,
    pub revision: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub profiles: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
