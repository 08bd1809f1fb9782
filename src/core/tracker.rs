use std::sync::Arc;
use uuid::Uuid;

use crate::core::scoring::Scorer;
use crate::core::store::{MatchStore, ProfileStore, SwipeStore};
use crate::error::MatchError;
use crate::models::{MutualMatch, PairKey, Profile, SwipeAction, SwipeRecord};

/// Result of recording one swipe
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    pub record: SwipeRecord,
    /// True once the pair has a mutual match, including matches made earlier
    pub is_mutual: bool,
    pub mutual_match: Option<MutualMatch>,
    /// True only for the swipe that created the match
    pub newly_matched: bool,
}

/// Swipe/match state machine over an unordered pair
///
/// No Interest -> One-Sided -> Mutual. Passes are recorded but never move a
/// pair toward Mutual, and Mutual is terminal: later swipes between the same
/// two profiles are appended to history and return the original match.
pub struct SwipeTracker<P, S, M> {
    profiles: Arc<P>,
    swipes: S,
    matches: M,
    scorer: Scorer,
}

impl<P, S, M> SwipeTracker<P, S, M>
where
    P: ProfileStore,
    S: SwipeStore,
    M: MatchStore,
{
    pub fn new(profiles: Arc<P>, swipes: S, matches: M, scorer: Scorer) -> Self {
        Self {
            profiles,
            swipes,
            matches,
            scorer,
        }
    }

    pub fn swipes(&self) -> &S {
        &self.swipes
    }

    pub fn matches(&self) -> &M {
        &self.matches
    }

    /// Record `actor_id`'s swipe on `target_id`
    ///
    /// Both ids must resolve through the profile store; nothing is recorded
    /// when validation fails.
    pub fn swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        action: SwipeAction,
    ) -> Result<SwipeOutcome, MatchError> {
        if actor_id == target_id {
            tracing::warn!("Rejected self-swipe by {}", actor_id);
            return Err(MatchError::InvalidInput(format!(
                "profile {} cannot swipe on itself",
                actor_id
            )));
        }

        let actor = self.profiles.require(actor_id)?;
        let target = self.profiles.require(target_id)?;

        let record = SwipeRecord {
            id: Uuid::new_v4(),
            actor_id: actor.id.clone(),
            target_id: target.id.clone(),
            action,
            created_at: self.scorer.clock().now(),
        };
        self.swipes.append(record.clone())?;

        let pair = PairKey::new(&actor.id, &target.id);

        // A pass or a still one-sided like only reports the pair's existing state
        if !action.is_interest() || !self.swipes.has_interest(&target.id, &actor.id)? {
            let existing = self.matches.get(&pair)?;
            tracing::debug!(
                "Recorded {:?} from {} to {} (mutual: {})",
                action,
                actor.id,
                target.id,
                existing.is_some()
            );
            return Ok(SwipeOutcome {
                record,
                is_mutual: existing.is_some(),
                mutual_match: existing,
                newly_matched: false,
            });
        }

        let (mutual_match, created) = self
            .matches
            .get_or_insert_with(&pair, &mut || self.create_match(&pair, &actor, &target))?;

        if created {
            tracing::info!(
                "Mutual match {} between {} and {} (score {})",
                mutual_match.id,
                mutual_match.user_a,
                mutual_match.user_b,
                mutual_match.compatibility_score
            );
        }

        Ok(SwipeOutcome {
            record,
            is_mutual: true,
            mutual_match: Some(mutual_match),
            newly_matched: created,
        })
    }

    /// The match score is the mean of both directions, so it does not depend
    /// on who swiped last.
    fn create_match(&self, pair: &PairKey, actor: &Profile, target: &Profile) -> MutualMatch {
        let weights = self.scorer.config().weights();
        let forward = self.scorer.score_with(&weights, actor, target).overall as u32;
        let backward = self.scorer.score_with(&weights, target, actor).overall as u32;

        MutualMatch {
            id: Uuid::new_v4(),
            user_a: pair.low().to_string(),
            user_b: pair.high().to_string(),
            compatibility_score: ((forward + backward) as f64 / 2.0).round() as u8,
            created_at: self.scorer.clock().now(),
            is_active: true,
        }
    }

    /// Deactivate the pair's match; the pair is never matched again
    pub fn unmatch(&self, user_id: &str, other_id: &str) -> Result<MutualMatch, MatchError> {
        if user_id == other_id {
            return Err(MatchError::InvalidInput(format!(
                "profile {} cannot unmatch itself",
                user_id
            )));
        }
        let pair = PairKey::new(user_id, other_id);
        let updated = self
            .matches
            .set_active(&pair, false)?
            .ok_or_else(|| {
                MatchError::NotFound(format!("match between {} and {}", user_id, other_id))
            })?;
        tracing::info!("Match {} deactivated by {}", updated.id, user_id);
        Ok(updated)
    }

    pub fn match_between(&self, a: &str, b: &str) -> Result<Option<MutualMatch>, MatchError> {
        self.matches.get(&PairKey::new(a, b))
    }

    /// Active matches of `user_id`, newest first
    pub fn matches_for(&self, user_id: &str) -> Result<Vec<MutualMatch>, MatchError> {
        let mut matches: Vec<MutualMatch> = self
            .matches
            .for_user(user_id)?
            .into_iter()
            .filter(|m| m.is_active)
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(matches)
    }

    /// Every swipe `actor_id` has made, oldest first
    pub fn history(&self, actor_id: &str) -> Result<Vec<SwipeRecord>, MatchError> {
        self.swipes.history(actor_id)
    }
}
