use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::core::store::{MatchStore, ProfileStore, SwipeStore};
use crate::error::MatchError;
use crate::models::{MutualMatch, PairKey, Profile, SwipeRecord};

/// Errors that can occur when seeding the profile store
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

/// Profile snapshot plus the revision it was stored under
#[derive(Debug, Clone)]
pub struct StoredProfile {
    pub profile: Profile,
    pub revision: u64,
}

/// In-memory profile store
///
/// Every upsert gets a fresh revision, so callers can key cached scores on
/// (id, revision) and never see a stale result.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<String, StoredProfile>,
    next_revision: AtomicU64,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of profiles
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let profiles: Vec<Profile> = serde_json::from_str(&data)?;
        let store = Self::new();
        for profile in profiles {
            if profile.id.trim().is_empty() {
                return Err(SeedError::InvalidProfile("profile id is empty".to_string()));
            }
            store.upsert(profile);
        }
        tracing::info!("Seeded {} profiles from {}", store.len(), path.as_ref().display());
        Ok(store)
    }

    /// Insert or replace a profile, returning its new revision
    pub fn upsert(&self, profile: Profile) -> u64 {
        let revision = self.next_revision.fetch_add(1, Ordering::Relaxed) + 1;
        self.profiles
            .insert(profile.id.clone(), StoredProfile { profile, revision });
        revision
    }

    pub fn get_stored(&self, id: &str) -> Option<StoredProfile> {
        self.profiles.get(id).map(|entry| entry.value().clone())
    }

    /// All profiles, ordered by id
    pub fn all(&self) -> Vec<Profile> {
        let mut profiles: Vec<Profile> = self
            .profiles
            .iter()
            .map(|entry| entry.value().profile.clone())
            .collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn get(&self, id: &str) -> Result<Option<Profile>, MatchError> {
        Ok(self.profiles.get(id).map(|entry| entry.value().profile.clone()))
    }
}

/// In-memory swipe history, sharded by actor
#[derive(Debug, Default)]
pub struct InMemorySwipeStore {
    by_actor: DashMap<String, Vec<SwipeRecord>>,
}

impl InMemorySwipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of recorded swipes
    pub fn len(&self) -> usize {
        self.by_actor.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SwipeStore for InMemorySwipeStore {
    fn append(&self, record: SwipeRecord) -> Result<(), MatchError> {
        self.by_actor
            .entry(record.actor_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    fn has_interest(&self, actor_id: &str, target_id: &str) -> Result<bool, MatchError> {
        Ok(self
            .by_actor
            .get(actor_id)
            .map(|records| {
                records
                    .iter()
                    .any(|r| r.target_id == target_id && r.action.is_interest())
            })
            .unwrap_or(false))
    }

    fn history(&self, actor_id: &str) -> Result<Vec<SwipeRecord>, MatchError> {
        Ok(self
            .by_actor
            .get(actor_id)
            .map(|records| records.value().clone())
            .unwrap_or_default())
    }
}

/// In-memory match table keyed by unordered pair
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    matches: DashMap<PairKey, MutualMatch>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl MatchStore for InMemoryMatchStore {
    fn get_or_insert_with(
        &self,
        pair: &PairKey,
        create: &mut dyn FnMut() -> MutualMatch,
    ) -> Result<(MutualMatch, bool), MatchError> {
        // The entry holds the shard write lock until it is dropped
        match self.matches.entry(pair.clone()) {
            Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
            Entry::Vacant(slot) => {
                let created = slot.insert(create());
                Ok((created.value().clone(), true))
            }
        }
    }

    fn get(&self, pair: &PairKey) -> Result<Option<MutualMatch>, MatchError> {
        Ok(self.matches.get(pair).map(|entry| entry.value().clone()))
    }

    fn for_user(&self, user_id: &str) -> Result<Vec<MutualMatch>, MatchError> {
        Ok(self
            .matches
            .iter()
            .filter(|entry| entry.key().contains(user_id))
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn set_active(&self, pair: &PairKey, active: bool) -> Result<Option<MutualMatch>, MatchError> {
        Ok(self.matches.get_mut(pair).map(|mut entry| {
            entry.is_active = active;
            entry.value().clone()
        }))
    }
}
