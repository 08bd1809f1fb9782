use std::collections::HashSet;

use crate::error::MatchError;
use crate::models::{MutualMatch, PairKey, Profile, SwipeRecord};

/// Resolves profile snapshots by id
pub trait ProfileStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Profile>, MatchError>;

    /// Like `get`, but a missing profile is a `NotFound` error
    fn require(&self, id: &str) -> Result<Profile, MatchError> {
        self.get(id)?.ok_or_else(|| MatchError::profile_not_found(id))
    }
}

/// Append-only swipe history
pub trait SwipeStore: Send + Sync {
    fn append(&self, record: SwipeRecord) -> Result<(), MatchError>;

    /// Whether `actor_id` has ever liked or super-liked `target_id`
    fn has_interest(&self, actor_id: &str, target_id: &str) -> Result<bool, MatchError>;

    /// Every swipe made by `actor_id`, oldest first
    fn history(&self, actor_id: &str) -> Result<Vec<SwipeRecord>, MatchError>;

    fn swiped_targets(&self, actor_id: &str) -> Result<HashSet<String>, MatchError> {
        Ok(self
            .history(actor_id)?
            .into_iter()
            .map(|record| record.target_id)
            .collect())
    }
}

/// Mutual matches keyed by unordered pair
///
/// `get_or_insert_with` is the per-pair serialization point: implementations
/// must run the check and the insert atomically for a given pair, so two
/// racing callers observe the same match and `create` runs at most once.
pub trait MatchStore: Send + Sync {
    /// Returns the pair's match and whether this call created it
    fn get_or_insert_with(
        &self,
        pair: &PairKey,
        create: &mut dyn FnMut() -> MutualMatch,
    ) -> Result<(MutualMatch, bool), MatchError>;

    fn get(&self, pair: &PairKey) -> Result<Option<MutualMatch>, MatchError>;

    /// Matches involving `user_id`, active or not
    fn for_user(&self, user_id: &str) -> Result<Vec<MutualMatch>, MatchError>;

    /// Set the active flag of an existing match; `None` if the pair never matched
    fn set_active(&self, pair: &PairKey, active: bool) -> Result<Option<MutualMatch>, MatchError>;
}
