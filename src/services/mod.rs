// Service exports
pub mod cache;
pub mod memory;

pub use cache::{BreakdownCache, CacheKey, CacheStats};
pub use memory::{InMemoryMatchStore, InMemoryProfileStore, InMemorySwipeStore, SeedError, StoredProfile};
