//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities and sessions.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new opaque entity ID.
    ///
    /// IDs are lowercase ULIDs, so they sort by creation time.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a session token.
    ///
    /// Tokens carry no time component.
    #[must_use]
    pub fn generate_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Check whether `id` has the shape of an ID produced by [`Self::generate`].
    #[must_use]
    pub fn is_well_formed(id: &str) -> bool {
        id.len() == 26 && Ulid::from_string(id).is_ok()
    }
}
