use thiserror::Error;

/// Errors surfaced by the matching core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Rejected synchronously; no state was changed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A profile id did not resolve through the profile store
    #[error("Not found: {0}")]
    NotFound(String),

    /// A store backend failed
    #[error("Store error: {0}")]
    Store(String),
}

impl MatchError {
    pub fn profile_not_found(id: &str) -> Self {
        MatchError::NotFound(format!("profile {}", id))
    }
}
