// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgeRange, BudgetBounds, BudgetRange, Category, CategoryScores, Cleanliness,
    CompatibilityBreakdown, CompatibilityDetail, Currency, DealBreakers, DiscoveryFilters,
    DrinkingHabit, Gender, GenderPreference, GuestPolicy, HousingType, Lifestyle, Location,
    MutualMatch, PairKey, PetStance, Profile, RankedCandidate, RoommatePreferences,
    ScoringWeights, SleepSchedule, SmokingHabit, SocialLevel, SwipeAction, SwipeRecord,
    WorkSchedule,
};
pub use requests::{CompatibilityRequest, DiscoverRequest, SwipeRequest};
pub use responses::{
    DiscoverResponse, ErrorResponse, HealthResponse, MatchesResponse, SwipeHistoryResponse,
    SwipeResponse, WeightsResponse,
};
