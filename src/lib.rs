//! Roomly Match - compatibility scoring and discovery for roommate matching
//!
//! The core has three parts:
//! - [`core::Scorer`]: multi-category compatibility between two profiles
//! - [`core::Ranker`]: filters, scores and ranks a candidate pool into a feed
//! - [`core::SwipeTracker`]: records swipes and turns reciprocal interest into mutual matches

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Ranker, Scorer, ScoringConfig, SwipeTracker};
pub use error::MatchError;
pub use models::{CompatibilityBreakdown, DiscoveryFilters, MutualMatch, Profile, ScoringWeights, SwipeAction};
