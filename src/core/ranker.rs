use crate::core::{filters::{passes_hard_filters, validate_filters}, scoring::Scorer};
use crate::error::MatchError;
use crate::models::{DiscoveryFilters, Profile, RankedCandidate};

/// Ranked discovery feed
#[derive(Debug, Clone)]
pub struct DiscoveryResult {
    pub feed: Vec<RankedCandidate>,
    /// Candidates that passed every filter, before truncation to the limit
    pub total_eligible: usize,
    pub has_more: bool,
}

/// Discovery orchestrator - filters, scores and ranks a candidate pool
///
/// # Pipeline Stages
/// 1. Self exclusion
/// 2. Hard filters (verification, photo, gender, housing, age, budget)
/// 3. Compatibility scoring
/// 4. Compatibility floor
/// 5. Ranking by score, then id
///
/// Discovery has no side effects; the same inputs always yield the same feed.
#[derive(Debug, Clone)]
pub struct Ranker {
    scorer: Scorer,
}

impl Ranker {
    pub fn new(scorer: Scorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Build the discovery feed for `viewer` out of `pool`
    ///
    /// # Arguments
    /// * `viewer` - The profile the feed is built for
    /// * `pool` - Candidate profiles supplied by the caller
    /// * `filters` - Hard filters and compatibility floor
    /// * `limit` - Maximum number of candidates to return
    pub fn discover(
        &self,
        viewer: &Profile,
        pool: &[Profile],
        filters: &DiscoveryFilters,
        limit: usize,
    ) -> Result<DiscoveryResult, MatchError> {
        validate_filters(filters)?;

        // One weight snapshot and one "today" for the whole request
        let weights = self.scorer.config().weights();
        let today = self.scorer.clock().today();

        let mut ranked: Vec<RankedCandidate> = pool
            .iter()
            .filter(|candidate| candidate.id != viewer.id)
            .filter(|candidate| passes_hard_filters(candidate, filters, today))
            .filter_map(|candidate| {
                let compatibility = self.scorer.score_on(&weights, today, viewer, candidate);
                if compatibility.overall < filters.min_compatibility_score {
                    return None;
                }
                Some(RankedCandidate {
                    profile: candidate.clone(),
                    compatibility,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.compatibility
                .overall
                .cmp(&a.compatibility.overall)
                .then_with(|| a.profile.id.cmp(&b.profile.id))
        });

        let total_eligible = ranked.len();
        ranked.truncate(limit);

        tracing::debug!(
            "Discovery for {}: {} in pool, {} eligible, returning {}",
            viewer.id,
            pool.len(),
            total_eligible,
            ranked.len()
        );

        Ok(DiscoveryResult {
            feed: ranked,
            total_eligible,
            has_more: total_eligible > limit,
        })
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(Scorer::with_default_weights())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::scoring::ScoringConfig;
    use crate::models::{BudgetRange, Currency, Gender, Location};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn test_ranker() -> Ranker {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Ranker::new(Scorer::new(ScoringConfig::default(), Arc::new(FixedClock::on(today))))
    }

    fn create_candidate(id: &str, born: i32, gender: Gender, city: &str) -> Profile {
        let mut profile = Profile::new(id);
        profile.birth_date = NaiveDate::from_ymd_opt(born, 3, 1);
        profile.gender = Some(gender);
        profile.location = Some(Location { city: city.to_string(), state: "CA".to_string() });
        profile.preferences.budget = Some(BudgetRange { min: 1000, max: 1600, currency: Currency::Usd });
        profile.photo_count = 1;
        profile
    }

    fn create_viewer() -> Profile {
        create_candidate("viewer", 1996, Gender::Female, "Oakland")
    }

    #[test]
    fn test_discover_basic() {
        let ranker = test_ranker();
        let viewer = create_viewer();
        let filters = DiscoveryFilters {
            genders: [Gender::Female].into_iter().collect(),
            ..DiscoveryFilters::default()
        };

        let pool = vec![
            create_candidate("1", 1995, Gender::Female, "Oakland"),
            create_candidate("2", 1995, Gender::Male, "Oakland"),
            viewer.clone(),
        ];

        let result = ranker.discover(&viewer, &pool, &filters, 10).unwrap();

        assert_eq!(result.feed.len(), 1);
        assert_eq!(result.feed[0].profile.id, "1");
        assert_eq!(result.total_eligible, 1);
        assert!(!result.has_more);
    }

    #[test]
    fn test_feed_sorted_by_score_then_id() {
        let ranker = test_ranker();
        let viewer = create_viewer();
        let pool = vec![
            create_candidate("c", 1995, Gender::Female, "Fresno"),
            create_candidate("b", 1995, Gender::Female, "Oakland"),
            create_candidate("a", 1995, Gender::Female, "Oakland"),
        ];

        let result = ranker.discover(&viewer, &pool, &DiscoveryFilters::default(), 10).unwrap();
        let ids: Vec<&str> = result.feed.iter().map(|c| c.profile.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(result.feed[1].compatibility.overall > result.feed[2].compatibility.overall);
    }

    #[test]
    fn test_respects_limit() {
        let ranker = test_ranker();
        let viewer = create_viewer();
        let pool: Vec<Profile> = (0..20)
            .map(|i| create_candidate(&format!("u{:02}", i), 1990 + i % 8, Gender::Female, "Oakland"))
            .collect();

        let result = ranker.discover(&viewer, &pool, &DiscoveryFilters::default(), 5).unwrap();

        assert_eq!(result.feed.len(), 5);
        assert_eq!(result.total_eligible, 20);
        assert!(result.has_more);
    }

    #[test]
    fn test_compatibility_floor() {
        let ranker = test_ranker();
        let viewer = create_viewer();
        let pool = vec![
            create_candidate("near", 1996, Gender::Female, "Oakland"),
            create_candidate("far", 1960, Gender::Female, "Fresno"),
        ];

        let everyone = ranker.discover(&viewer, &pool, &DiscoveryFilters::default(), 10).unwrap();
        let floor = everyone.feed[0].compatibility.overall;
        let filters = DiscoveryFilters {
            min_compatibility_score: floor,
            ..DiscoveryFilters::default()
        };
        let result = ranker.discover(&viewer, &pool, &filters, 10).unwrap();

        assert_eq!(result.total_eligible, 1);
        assert_eq!(result.feed[0].profile.id, "near");
    }

    #[test]
    fn test_malformed_filters_fail_fast() {
        let ranker = test_ranker();
        let viewer = create_viewer();
        let mut filters = DiscoveryFilters::default();
        filters.age_range.min = 50;
        filters.age_range.max = 20;

        let result = ranker.discover(&viewer, &[], &filters, 10);
        assert!(matches!(result, Err(MatchError::InvalidInput(_))));
    }

    #[derive(Debug, Default)]
    struct CountingClock {
        reads: std::sync::atomic::AtomicUsize,
    }

    impl crate::core::clock::Clock for CountingClock {
        fn now(&self) -> chrono::DateTime<chrono::Utc> {
            let reads = self.reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst) as i64;
            // Each read lands one day later
            FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).0 + chrono::Duration::days(reads)
        }
    }

    #[test]
    fn test_one_date_per_request() {
        let clock = Arc::new(CountingClock::default());
        let ranker = Ranker::new(Scorer::new(ScoringConfig::default(), clock.clone()));
        let viewer = create_viewer();
        let pool: Vec<Profile> = (0..5)
            .map(|i| create_candidate(&format!("u{}", i), 1995, Gender::Female, "Oakland"))
            .collect();

        let result = ranker.discover(&viewer, &pool, &DiscoveryFilters::default(), 10).unwrap();

        assert_eq!(result.total_eligible, 5);
        assert_eq!(clock.reads.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
