//! Deterministic agent identifier used by the agent service.

use crate::ledger::domain::TokenId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier for a registered agent.
///
/// Derived deterministically from the draft name and the minted token id
/// so that two mints of the same name never collide: the same
/// `(name, token)` pair always yields the same identifier, and the token
/// suffix keeps identifiers unique per mint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Derives the identifier `"<slug>_t<token>"` from a display name and
    /// a minted token id.
    ///
    /// The slug is the lowercased name with every non-alphanumeric run
    /// collapsed to a single underscore.
    #[must_use]
    pub fn derive(name: &str, token_id: TokenId) -> Self {
        let mut slug = String::with_capacity(name.len());
        for ch in name.trim().to_lowercase().chars() {
            if ch.is_alphanumeric() {
                slug.push(ch);
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        let trimmed = slug.trim_matches('_');
        Self(format!("{trimmed}_t{token_id}"))
    }

    /// Wraps an identifier received from the agent service.
    #[must_use]
    pub fn from_wire(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
