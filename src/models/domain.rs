use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::error::MatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Gender::Male, Gender::Female, Gender::NonBinary, Gender::Other];
}

/// Gender a viewer wants to live with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderPreference {
    NoPreference,
    Male,
    Female,
    NonBinary,
    Other,
}

impl GenderPreference {
    /// Whether a candidate of `gender` satisfies this preference
    pub fn accepts(self, gender: Gender) -> bool {
        matches!(
            (self, gender),
            (GenderPreference::NoPreference, _)
                | (GenderPreference::Male, Gender::Male)
                | (GenderPreference::Female, Gender::Female)
                | (GenderPreference::NonBinary, Gender::NonBinary)
                | (GenderPreference::Other, Gender::Other)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepSchedule {
    EarlyBird,
    NightOwl,
    Flexible,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cleanliness {
    Relaxed,
    Moderate,
    VeryClean,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialLevel {
    Quiet,
    Moderate,
    VerySocial,
    #[serde(other)]
    Unrecognized,
}

/// How often a person has overnight guests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestPolicy {
    Rarely,
    Occasionally,
    Frequently,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingHabit {
    NonSmoker,
    SocialSmoker,
    Smoker,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkingHabit {
    Never,
    Socially,
    Regularly,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetStance {
    NoPets,
    OpenToPets,
    HasPets,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkSchedule {
    DayShift,
    NightShift,
    Flexible,
    Student,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    Apartment,
    House,
    Condo,
    Townhouse,
    Studio,
}

impl HousingType {
    pub const ALL: [HousingType; 5] = [
        HousingType::Apartment,
        HousingType::House,
        HousingType::Condo,
        HousingType::Townhouse,
        HousingType::Studio,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
}

/// Lifestyle attributes; every field is optional and unknown values score neutrally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lifestyle {
    pub sleep_schedule: Option<SleepSchedule>,
    pub cleanliness: Option<Cleanliness>,
    pub social_level: Option<SocialLevel>,
    pub guest_policy: Option<GuestPolicy>,
    pub smoking: Option<SmokingHabit>,
    pub drinking: Option<DrinkingHabit>,
    pub pets: Option<PetStance>,
    pub work_schedule: Option<WorkSchedule>,
    pub work_from_home: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
}

impl Location {
    pub fn same_city(&self, other: &Location) -> bool {
        eq_ignore_case(&self.city, &other.city)
    }

    pub fn same_state(&self, other: &Location) -> bool {
        eq_ignore_case(&self.state, &other.state)
    }

    /// Neither city nor state given
    pub fn is_blank(&self) -> bool {
        self.city.trim().is_empty() && self.state.trim().is_empty()
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && a.to_lowercase() == b.to_lowercase()
}

/// Inclusive age range in whole years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub fn contains(&self, age: u32) -> bool {
        age >= self.min && age <= self.max
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self { min: 18, max: 99 }
    }
}

/// Monthly rent budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: u32,
    pub max: u32,
    #[serde(default)]
    pub currency: Currency,
}

impl BudgetRange {
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max as f64 - self.min as f64
    }

    pub fn midpoint(&self) -> f64 {
        (self.min as f64 + self.max as f64) / 2.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DealBreakers {
    pub smoking: bool,
    pub pets: bool,
    pub parties: bool,
    pub overnight_guests: bool,
}

impl DealBreakers {
    pub fn any(&self) -> bool {
        self.smoking || self.pets || self.parties || self.overnight_guests
    }
}

/// What a person is looking for in a roommate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoommatePreferences {
    pub age_range: Option<AgeRange>,
    pub gender: Option<GenderPreference>,
    pub housing_types: BTreeSet<HousingType>,
    pub budget: Option<BudgetRange>,
    pub deal_breakers: DealBreakers,
}

/// Immutable profile snapshot supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub preferences: RoommatePreferences,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub photo_count: u32,
}

impl Profile {
    /// Profile with only an id; every optional attribute unknown
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            birth_date: None,
            gender: None,
            location: None,
            lifestyle: Lifestyle::default(),
            interests: BTreeSet::new(),
            preferences: RoommatePreferences::default(),
            is_verified: false,
            photo_count: 0,
        }
    }

    /// Age in whole years on `today`, if the birth date is known
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let born = self.birth_date?;
        if born > today {
            return None;
        }
        let mut years = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// Interests trimmed and lowercased, blanks dropped
    pub fn normalized_interests(&self) -> BTreeSet<String> {
        self.interests
            .iter()
            .map(|i| i.trim().to_lowercase())
            .filter(|i| !i.is_empty())
            .collect()
    }

    pub fn has_photo(&self) -> bool {
        self.photo_count > 0
    }
}

/// Scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Lifestyle,
    Budget,
    Location,
    Preferences,
    DealBreakers,
    Interests,
    Age,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Lifestyle,
        Category::Budget,
        Category::Location,
        Category::Preferences,
        Category::DealBreakers,
        Category::Interests,
        Category::Age,
    ];
}

/// One 0-100 score per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub lifestyle: u8,
    pub budget: u8,
    pub location: u8,
    pub preferences: u8,
    pub deal_breakers: u8,
    pub interests: u8,
    pub age: u8,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> u8 {
        match category {
            Category::Lifestyle => self.lifestyle,
            Category::Budget => self.budget,
            Category::Location => self.location,
            Category::Preferences => self.preferences,
            Category::DealBreakers => self.deal_breakers,
            Category::Interests => self.interests,
            Category::Age => self.age,
        }
    }

    pub fn set(&mut self, category: Category, score: u8) {
        let slot = match category {
            Category::Lifestyle => &mut self.lifestyle,
            Category::Budget => &mut self.budget,
            Category::Location => &mut self.location,
            Category::Preferences => &mut self.preferences,
            Category::DealBreakers => &mut self.deal_breakers,
            Category::Interests => &mut self.interests,
            Category::Age => &mut self.age,
        };
        *slot = score;
    }
}

/// Human-readable explanation of one category score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityDetail {
    pub category: Category,
    pub score: u8,
    pub reason: String,
    pub is_positive: bool,
}

/// Result of scoring one (viewer, candidate) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityBreakdown {
    pub overall: u8,
    pub categories: CategoryScores,
    pub details: Vec<CompatibilityDetail>,
}

/// Category weights for the overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub lifestyle: f64,
    pub budget: f64,
    pub location: f64,
    pub preferences: f64,
    pub deal_breakers: f64,
    pub interests: f64,
    pub age: f64,
}

impl ScoringWeights {
    const SUM_TOLERANCE: f64 = 1e-6;

    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Lifestyle => self.lifestyle,
            Category::Budget => self.budget,
            Category::Location => self.location,
            Category::Preferences => self.preferences,
            Category::DealBreakers => self.deal_breakers,
            Category::Interests => self.interests,
            Category::Age => self.age,
        }
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.weight(*c)).sum()
    }

    /// Weights must be finite, non-negative and sum to 1.0
    pub fn validate(&self) -> Result<(), MatchError> {
        for category in Category::ALL {
            let w = self.weight(category);
            if !w.is_finite() || w < 0.0 {
                return Err(MatchError::InvalidInput(format!(
                    "weight for {:?} must be a non-negative number, got {}",
                    category, w
                )));
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(MatchError::InvalidInput(format!(
                "weights must sum to 1.0, got {}",
                total
            )));
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            lifestyle: 0.25,
            budget: 0.20,
            location: 0.15,
            preferences: 0.15,
            deal_breakers: 0.10,
            interests: 0.10,
            age: 0.05,
        }
    }
}

/// Inclusive budget bounds used as a discovery filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for BudgetBounds {
    fn default() -> Self {
        Self { min: 0, max: u32::MAX }
    }
}

/// Request-scoped discovery filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryFilters {
    pub age_range: AgeRange,
    pub budget_range: BudgetBounds,
    /// Empty means any gender
    pub genders: BTreeSet<Gender>,
    /// Empty means any housing type
    pub housing_types: BTreeSet<HousingType>,
    pub min_compatibility_score: u8,
    pub require_photo: bool,
    pub require_verified: bool,
}

impl Default for DiscoveryFilters {
    fn default() -> Self {
        Self {
            age_range: AgeRange::default(),
            budget_range: BudgetBounds::default(),
            genders: BTreeSet::new(),
            housing_types: BTreeSet::new(),
            min_compatibility_score: 0,
            require_photo: false,
            require_verified: false,
        }
    }
}

/// Candidate with its compatibility against the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub profile: Profile,
    pub compatibility: CompatibilityBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeAction {
    Like,
    Pass,
    SuperLike,
}

impl SwipeAction {
    /// Like and super-like count as interest; pass does not
    pub fn is_interest(self) -> bool {
        !matches!(self, SwipeAction::Pass)
    }
}

/// One directed swipe; append-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRecord {
    pub id: Uuid,
    pub actor_id: String,
    pub target_id: String,
    pub action: SwipeAction,
    pub created_at: DateTime<Utc>,
}

/// Unordered pair of profile ids, stored lowest first
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    low: String,
    high: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }

    pub fn contains(&self, id: &str) -> bool {
        self.low == id || self.high == id
    }
}

/// Mutual match between two profiles, created once per pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualMatch {
    pub id: Uuid,
    pub user_a: String,
    pub user_b: String,
    pub compatibility_score: u8,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl MutualMatch {
    pub fn pair(&self) -> PairKey {
        PairKey::new(&self.user_a, &self.user_b)
    }
}
