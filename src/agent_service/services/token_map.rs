//! Cached resolution of token identifiers to agent identifiers.

use crate::agent_service::{
    domain::AgentId,
    ports::{AgentServiceClient, AgentServiceError},
};
use crate::ledger::domain::TokenId;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::debug;

/// Result type for token resolution.
pub type TokenResolutionResult<T> = Result<T, TokenResolutionError>;

/// Errors returned while resolving a token to an agent identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenResolutionError {
    /// The token is unknown even after refreshing the map once.
    ///
    /// Fatal for the single call that needed the identifier, not for the
    /// owning workflow instance.
    #[error("no agent registered for token {0}")]
    UnknownTokenId(TokenId),

    /// The map could not be fetched from the agent service.
    #[error(transparent)]
    Service(#[from] AgentServiceError),
}

/// Resolves agent identifiers from minted token identifiers.
///
/// Lookups are served from a cached snapshot of the service's token map.
/// On a miss the map is refreshed exactly once before the lookup fails
/// with [`TokenResolutionError::UnknownTokenId`].
#[derive(Clone)]
pub struct TokenMapResolver<B>
where
    B: AgentServiceClient,
{
    client: Arc<B>,
    cache: Arc<RwLock<BTreeMap<TokenId, AgentId>>>,
}

impl<B> TokenMapResolver<B>
where
    B: AgentServiceClient,
{
    /// Creates a resolver with an empty cache.
    #[must_use]
    pub fn new(client: Arc<B>) -> Self {
        Self {
            client,
            cache: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Resolves the agent identifier for a minted token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenResolutionError::Service`] when the refresh fetch
    /// fails, or [`TokenResolutionError::UnknownTokenId`] when the token
    /// is still absent after one refresh.
    pub async fn resolve(&self, token_id: TokenId) -> TokenResolutionResult<AgentId> {
        if let Some(cached) = self.cached(token_id) {
            return Ok(cached);
        }
        debug!(%token_id, "token map cache miss, refreshing");
        self.refresh().await?;
        self.cached(token_id)
            .ok_or(TokenResolutionError::UnknownTokenId(token_id))
    }

    /// Replaces the cached snapshot with a fresh fetch from the service.
    ///
    /// # Errors
    ///
    /// Returns [`TokenResolutionError::Service`] when the fetch fails.
    pub async fn refresh(&self) -> TokenResolutionResult<()> {
        let fresh = self.client.token_map().await?;
        if let Ok(mut cache) = self.cache.write() {
            *cache = fresh;
        }
        Ok(())
    }

    fn cached(&self, token_id: TokenId) -> Option<AgentId> {
        self.cache
            .read()
            .ok()
            .and_then(|cache| cache.get(&token_id).cloned())
    }
}
