use serde::{Deserialize, Serialize};
use std::fmt;

use crate::token;

/// Unique identifier for a player within a session.
///
/// Assigned at join time and handed back to the client, which holds it as
/// its opaque identity token for voting and word retrieval.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random player id.
    pub fn generate() -> Self {
        Self(token::generate())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
