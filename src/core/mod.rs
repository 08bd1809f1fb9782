// Core algorithm exports
pub mod clock;
pub mod filters;
pub mod ordinal;
pub mod ranker;
pub mod scoring;
pub mod store;
pub mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use filters::{passes_hard_filters, validate_filters};
pub use ordinal::{ordinal_distance_score, Ordinal};
pub use ranker::{DiscoveryResult, Ranker};
pub use scoring::{Scorer, ScoringConfig, WeightsSnapshot};
pub use store::{MatchStore, ProfileStore, SwipeStore};
pub use tracker::{SwipeOutcome, SwipeTracker};
