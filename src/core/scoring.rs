use chrono::NaiveDate;
use std::sync::{Arc, RwLock};

use crate::core::clock::{Clock, SystemClock};
use crate::core::ordinal::{ordinal_distance_score, UNRECOGNIZED_SCORE};
use crate::error::MatchError;
use crate::models::{
    BudgetRange, Category, CategoryScores, CompatibilityBreakdown, CompatibilityDetail,
    GuestPolicy, Lifestyle, PetStance, Profile, ScoringWeights, SleepSchedule, SmokingHabit,
    SocialLevel,
};

/// Score a category contributes when either side lacks the data for it
pub const NEUTRAL_SCORE: u8 = 50;

/// Category scores at or above this are reported as positive details
const POSITIVE_THRESHOLD: u8 = 60;

/// Weights plus a revision that increments on every change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightsSnapshot {
    pub weights: ScoringWeights,
    pub revision: u64,
}

/// Runtime-tunable scoring weights shared by every clone of a [`Scorer`]
///
/// Each scoring call reads one snapshot under the lock, so a concurrent
/// `set_weights` is seen either entirely or not at all.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    state: Arc<RwLock<WeightsSnapshot>>,
}

impl ScoringConfig {
    pub fn new(weights: ScoringWeights) -> Result<Self, MatchError> {
        weights.validate()?;
        Ok(Self {
            state: Arc::new(RwLock::new(WeightsSnapshot {
                weights,
                revision: 0,
            })),
        })
    }

    pub fn snapshot(&self) -> WeightsSnapshot {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn weights(&self) -> ScoringWeights {
        self.snapshot().weights
    }

    /// Replace the weights; takes effect on the next scoring call
    pub fn set_weights(&self, weights: ScoringWeights) -> Result<WeightsSnapshot, MatchError> {
        weights.validate()?;
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.weights = weights;
        state.revision += 1;
        tracing::info!("Scoring weights updated to revision {}: {:?}", state.revision, weights);
        Ok(*state)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(WeightsSnapshot {
                weights: ScoringWeights::default(),
                revision: 0,
            })),
        }
    }
}

/// Computes the multi-category compatibility of a candidate for a viewer
///
/// Scoring is directional: the viewer's preferences and deal-breakers are
/// checked against the candidate, never the other way round, so
/// `score(a, b)` and `score(b, a)` may differ.
#[derive(Clone)]
pub struct Scorer {
    config: ScoringConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Scorer {
    pub fn new(config: ScoringConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringConfig::default(), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Score `candidate` from `viewer`'s point of view with the current weights
    pub fn score(&self, viewer: &Profile, candidate: &Profile) -> CompatibilityBreakdown {
        let snapshot = self.config.snapshot();
        self.score_with(&snapshot.weights, viewer, candidate)
    }

    /// Score with an explicit weight vector
    pub fn score_with(
        &self,
        weights: &ScoringWeights,
        viewer: &Profile,
        candidate: &Profile,
    ) -> CompatibilityBreakdown {
        self.score_on(weights, self.clock.today(), viewer, candidate)
    }

    /// Score with explicit weights and an explicit date for age calculation
    pub fn score_on(
        &self,
        weights: &ScoringWeights,
        today: NaiveDate,
        viewer: &Profile,
        candidate: &Profile,
    ) -> CompatibilityBreakdown {
        let viewer_age = viewer.age_on(today);
        let candidate_age = candidate.age_on(today);

        let outcomes = [
            (Category::Lifestyle, lifestyle_score(&viewer.lifestyle, &candidate.lifestyle)),
            (Category::Budget, budget_score(viewer, candidate)),
            (Category::Location, location_score(viewer, candidate)),
            (Category::Preferences, preferences_score(viewer, candidate, candidate_age)),
            (Category::DealBreakers, deal_breaker_score(viewer, candidate)),
            (Category::Interests, interests_score(viewer, candidate)),
            (Category::Age, age_score(viewer_age, candidate_age)),
        ];

        let mut categories = CategoryScores::default();
        let mut details = Vec::new();
        let mut weighted = 0.0;

        for (category, outcome) in outcomes {
            let score = match outcome {
                Some(outcome) => {
                    details.push(CompatibilityDetail {
                        category,
                        score: outcome.score,
                        reason: outcome.reason,
                        is_positive: outcome.score >= POSITIVE_THRESHOLD,
                    });
                    outcome.score
                }
                None => NEUTRAL_SCORE,
            };
            categories.set(category, score);
            weighted += weights.weight(category) * score as f64;
        }

        CompatibilityBreakdown {
            overall: weighted.round().clamp(0.0, 100.0) as u8,
            categories,
            details,
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Score and explanation for one category with data on both sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOutcome {
    pub score: u8,
    pub reason: String,
}

impl CategoryOutcome {
    fn new(score: u8, reason: impl Into<String>) -> Self {
        Self {
            score: score.min(100),
            reason: reason.into(),
        }
    }
}

fn mean(scores: &[u8]) -> Option<u8> {
    if scores.is_empty() {
        return None;
    }
    let total: u32 = scores.iter().map(|s| *s as u32).sum();
    Some((total as f64 / scores.len() as f64).round() as u8)
}

/// 100 when identical, 75 when either side is flexible, 25 otherwise
pub fn sleep_schedule_score(a: SleepSchedule, b: SleepSchedule) -> u8 {
    if a == SleepSchedule::Unrecognized || b == SleepSchedule::Unrecognized {
        return UNRECOGNIZED_SCORE;
    }
    if a == b {
        100
    } else if a == SleepSchedule::Flexible || b == SleepSchedule::Flexible {
        75
    } else {
        25
    }
}

/// Mean of the sleep, cleanliness, social and work-from-home sub-checks
pub fn lifestyle_score(viewer: &Lifestyle, candidate: &Lifestyle) -> Option<CategoryOutcome> {
    let mut scores = Vec::with_capacity(4);
    let mut notes = Vec::with_capacity(4);

    if let (Some(a), Some(b)) = (viewer.sleep_schedule, candidate.sleep_schedule) {
        let s = sleep_schedule_score(a, b);
        scores.push(s);
        notes.push(match s {
            100 => "same sleep schedule",
            75 => "flexible sleep schedule",
            25 => "different sleep schedules",
            _ => "unfamiliar sleep schedule",
        });
    }

    if let (Some(a), Some(b)) = (viewer.cleanliness, candidate.cleanliness) {
        let s = ordinal_distance_score(a, b);
        scores.push(s);
        notes.push(describe_ordinal(s, "cleanliness"));
    }

    if let (Some(a), Some(b)) = (viewer.social_level, candidate.social_level) {
        let s = ordinal_distance_score(a, b);
        scores.push(s);
        notes.push(describe_ordinal(s, "social level"));
    }

    if let (Some(a), Some(b)) = (viewer.work_from_home, candidate.work_from_home) {
        if a == b {
            scores.push(100);
            notes.push("same work-from-home routine");
        } else {
            scores.push(60);
            notes.push("different work-from-home routines");
        }
    }

    let score = mean(&scores)?;
    Some(CategoryOutcome::new(score, capitalize(&notes.join(", "))))
}

fn describe_ordinal(score: u8, dimension: &str) -> &'static str {
    match (score, dimension) {
        (100, "cleanliness") => "same cleanliness standards",
        (100, _) => "same social level",
        (s, "cleanliness") if s == UNRECOGNIZED_SCORE => "unfamiliar cleanliness standard",
        (s, _) if s == UNRECOGNIZED_SCORE => "unfamiliar social level",
        (s, "cleanliness") if s >= POSITIVE_THRESHOLD => "similar cleanliness standards",
        (s, _) if s >= POSITIVE_THRESHOLD => "similar social levels",
        (_, "cleanliness") => "very different cleanliness standards",
        _ => "very different social levels",
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Overlap-or-gap score of two budget ranges (0-100)
///
/// Overlapping ranges score the overlap width against the average range
/// width. Disjoint ranges lose points in proportion to the gap between them
/// relative to the average midpoint.
pub fn budget_overlap_score(a: &BudgetRange, b: &BudgetRange) -> u8 {
    let overlap_min = a.min.max(b.min);
    let overlap_max = a.max.min(b.max);

    if overlap_min <= overlap_max {
        let overlap = (overlap_max - overlap_min) as f64;
        let average_width = (a.width() + b.width()) / 2.0;
        if average_width <= 0.0 {
            return 100;
        }
        return (100.0 * overlap / average_width).min(100.0).round() as u8;
    }

    let gap = (a.min as f64 - b.max as f64)
        .abs()
        .min((b.min as f64 - a.max as f64).abs());
    let average_midpoint = (a.midpoint() + b.midpoint()) / 2.0;
    if average_midpoint <= 0.0 {
        return 0;
    }
    (100.0 - 100.0 * gap / average_midpoint).max(0.0).round() as u8
}

fn budget_score(viewer: &Profile, candidate: &Profile) -> Option<CategoryOutcome> {
    let a = viewer.preferences.budget.filter(BudgetRange::is_valid)?;
    let b = candidate.preferences.budget.filter(BudgetRange::is_valid)?;
    if a.currency != b.currency {
        return None;
    }

    let score = budget_overlap_score(&a, &b);
    let overlaps = a.min.max(b.min) <= a.max.min(b.max);
    let reason = match (overlaps, score) {
        (true, s) if s >= 80 => "Budgets largely overlap",
        (true, _) => "Budgets partially overlap",
        (false, s) if s >= POSITIVE_THRESHOLD => "Budgets are close but do not overlap",
        (false, _) => "Budgets are far apart",
    };
    Some(CategoryOutcome::new(score, reason))
}

fn location_score(viewer: &Profile, candidate: &Profile) -> Option<CategoryOutcome> {
    let a = viewer.location.as_ref().filter(|l| !l.is_blank())?;
    let b = candidate.location.as_ref().filter(|l| !l.is_blank())?;

    let outcome = if a.same_city(b) {
        CategoryOutcome::new(100, format!("Both in {}", b.city.trim()))
    } else if a.state.trim().is_empty() || b.state.trim().is_empty() {
        return None;
    } else if a.same_state(b) {
        CategoryOutcome::new(75, format!("Same state ({})", b.state.trim()))
    } else {
        CategoryOutcome::new(25, "Different states")
    };
    Some(outcome)
}

/// Viewer's age, gender and housing preferences checked against the candidate
fn preferences_score(
    viewer: &Profile,
    candidate: &Profile,
    candidate_age: Option<u32>,
) -> Option<CategoryOutcome> {
    let wants = &viewer.preferences;
    let mut scores = Vec::with_capacity(3);
    let mut notes = Vec::with_capacity(3);

    if let (Some(range), Some(age)) = (wants.age_range, candidate_age) {
        if range.contains(age) {
            scores.push(100);
            notes.push("age within preferred range");
        } else {
            scores.push(25);
            notes.push("age outside preferred range");
        }
    }

    if let Some(preference) = wants.gender {
        let accepted = match candidate.gender {
            Some(gender) => Some(preference.accepts(gender)),
            None if preference == crate::models::GenderPreference::NoPreference => Some(true),
            None => None,
        };
        match accepted {
            Some(true) => {
                scores.push(100);
                notes.push("gender preference met");
            }
            Some(false) => {
                scores.push(0);
                notes.push("gender preference not met");
            }
            None => {}
        }
    }

    let theirs = &candidate.preferences.housing_types;
    if !wants.housing_types.is_empty() && !theirs.is_empty() {
        let shared = wants.housing_types.intersection(theirs).count();
        if shared > 0 {
            let largest = wants.housing_types.len().max(theirs.len());
            scores.push((100.0 * shared as f64 / largest as f64).round() as u8);
            notes.push("shared housing types");
        } else {
            scores.push(25);
            notes.push("no shared housing types");
        }
    }

    let score = mean(&scores)?;
    Some(CategoryOutcome::new(score, capitalize(&notes.join(", "))))
}

/// 0 on any violated deal-breaker, 100 otherwise
fn deal_breaker_score(viewer: &Profile, candidate: &Profile) -> Option<CategoryOutcome> {
    let flags = viewer.preferences.deal_breakers;
    if !flags.any() {
        return Some(CategoryOutcome::new(100, "No deal-breakers set"));
    }

    let theirs = &candidate.lifestyle;
    let mut checked = 0;
    let mut violations = Vec::new();

    let mut check = |enabled: bool, verdict: Option<bool>, label: &'static str| {
        if !enabled {
            return;
        }
        if let Some(violated) = verdict {
            checked += 1;
            if violated {
                violations.push(label);
            }
        }
    };

    check(
        flags.smoking,
        theirs.smoking.and_then(|s| match s {
            SmokingHabit::Smoker | SmokingHabit::SocialSmoker => Some(true),
            SmokingHabit::NonSmoker => Some(false),
            SmokingHabit::Unrecognized => None,
        }),
        "smoking",
    );
    check(
        flags.pets,
        theirs.pets.and_then(|p| match p {
            PetStance::HasPets => Some(true),
            PetStance::NoPets | PetStance::OpenToPets => Some(false),
            PetStance::Unrecognized => None,
        }),
        "pets",
    );
    check(
        flags.parties,
        theirs.social_level.and_then(|s| match s {
            SocialLevel::VerySocial => Some(true),
            SocialLevel::Quiet | SocialLevel::Moderate => Some(false),
            SocialLevel::Unrecognized => None,
        }),
        "parties",
    );
    check(
        flags.overnight_guests,
        theirs.guest_policy.and_then(|g| match g {
            GuestPolicy::Frequently => Some(true),
            GuestPolicy::Rarely | GuestPolicy::Occasionally => Some(false),
            GuestPolicy::Unrecognized => None,
        }),
        "overnight guests",
    );

    if !violations.is_empty() {
        return Some(CategoryOutcome::new(
            0,
            format!("Deal-breaker: {}", violations.join(", ")),
        ));
    }
    if checked == 0 {
        return None;
    }
    Some(CategoryOutcome::new(100, "No deal-breakers violated"))
}

/// Shared interests relative to the smaller interest set
pub fn interest_overlap_score(viewer: &Profile, candidate: &Profile) -> Option<(u8, usize)> {
    let a = viewer.normalized_interests();
    let b = candidate.normalized_interests();
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let shared = a.intersection(&b).count();
    let smaller = a.len().min(b.len());
    Some(((100.0 * shared as f64 / smaller as f64).round() as u8, shared))
}

fn interests_score(viewer: &Profile, candidate: &Profile) -> Option<CategoryOutcome> {
    let (score, shared) = interest_overlap_score(viewer, candidate)?;
    let reason = match shared {
        0 => "No shared interests".to_string(),
        1 => "1 shared interest".to_string(),
        n => format!("{} shared interests", n),
    };
    Some(CategoryOutcome::new(score, reason))
}

/// Banded decay by absolute age difference in years
pub fn age_gap_score(difference: u32) -> u8 {
    match difference {
        0..=2 => 100,
        3..=5 => 85,
        6..=10 => 70,
        11..=15 => 50,
        _ => 25,
    }
}

fn age_score(viewer_age: Option<u32>, candidate_age: Option<u32>) -> Option<CategoryOutcome> {
    let difference = viewer_age?.abs_diff(candidate_age?);
    let reason = match difference {
        0 => "Same age".to_string(),
        1 => "1 year apart".to_string(),
        n => format!("{} years apart", n),
    };
    Some(CategoryOutcome::new(age_gap_score(difference), reason))
}
