//! HTTP adapter for the agent service.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::agent_service::{
    domain::{AgentId, ExecutionData, ExecutionRequest, RegistrationOutcome, RegistrationRequest},
    ports::{AgentServiceClient, AgentServiceError, AgentServiceResult},
};
use crate::ledger::domain::TokenId;

/// Default bound for registration calls.
const DEFAULT_REGISTER_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound for execution calls.
const DEFAULT_EXECUTE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default bound for token-map fetches.
const DEFAULT_TOKEN_MAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`HttpAgentService`].
///
/// Constructed explicitly by the embedder; the adapter never reads
/// configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentServiceConfig {
    base_url: String,
    register_timeout: Duration,
    execute_timeout: Duration,
    token_map_timeout: Duration,
}

impl AgentServiceConfig {
    /// Creates a configuration for the given service base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let raw = base_url.into();
        Self {
            base_url: raw.trim_end_matches('/').to_owned(),
            register_timeout: DEFAULT_REGISTER_TIMEOUT,
            execute_timeout: DEFAULT_EXECUTE_TIMEOUT,
            token_map_timeout: DEFAULT_TOKEN_MAP_TIMEOUT,
        }
    }

    /// Overrides the registration call bound.
    #[must_use]
    pub const fn with_register_timeout(mut self, timeout: Duration) -> Self {
        self.register_timeout = timeout;
        self
    }

    /// Overrides the execution call bound.
    #[must_use]
    pub const fn with_execute_timeout(mut self, timeout: Duration) -> Self {
        self.execute_timeout = timeout;
        self
    }

    /// Overrides the token-map fetch bound.
    #[must_use]
    pub const fn with_token_map_timeout(mut self, timeout: Duration) -> Self {
        self.token_map_timeout = timeout;
        self
    }

    /// Returns the service base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// JSON response envelope shared by every agent service endpoint.
#[derive(Debug, Deserialize)]
struct ServiceEnvelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// Reqwest-backed implementation of [`AgentServiceClient`].
///
/// Each call carries its own timeout from [`AgentServiceConfig`]; a
/// timeout aborts the underlying request and is reported as
/// [`AgentServiceError::Timeout`] so callers can treat it as an unknown
/// outcome rather than a definite failure.
#[derive(Debug, Clone)]
pub struct HttpAgentService {
    client: reqwest::Client,
    config: AgentServiceConfig,
}

impl HttpAgentService {
    /// Creates an HTTP client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::Transport`] when the underlying HTTP
    /// client cannot be constructed.
    pub fn new(config: AgentServiceConfig) -> AgentServiceResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| AgentServiceError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    async fn post_envelope<T>(
        &self,
        url: String,
        body: &impl serde::Serialize,
        timeout: Duration,
    ) -> AgentServiceResult<ServiceEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| classify(&err, timeout))?;
        decode_envelope(response, timeout).await
    }

    async fn get_envelope<T>(
        &self,
        url: String,
        timeout: Duration,
    ) -> AgentServiceResult<ServiceEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| classify(&err, timeout))?;
        decode_envelope(response, timeout).await
    }
}

/// Maps a reqwest error to the port taxonomy, keeping timeouts distinct.
fn classify(err: &reqwest::Error, timeout: Duration) -> AgentServiceError {
    if err.is_timeout() {
        AgentServiceError::Timeout(timeout)
    } else {
        AgentServiceError::Transport(err.to_string())
    }
}

async fn decode_envelope<T>(
    response: reqwest::Response,
    timeout: Duration,
) -> AgentServiceResult<ServiceEnvelope<T>>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(AgentServiceError::Transport(format!(
            "unexpected status {status}"
        )));
    }
    response
        .json::<ServiceEnvelope<T>>()
        .await
        .map_err(|err| classify(&err, timeout))
}

#[async_trait]
impl AgentServiceClient for HttpAgentService {
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> AgentServiceResult<RegistrationOutcome> {
        let url = format!("{}/agents/register", self.config.base_url);
        debug!(agent_id = %request.agent_id, "registering agent");
        let envelope: ServiceEnvelope<serde_json::Value> = self
            .post_envelope(url, request, self.config.register_timeout)
            .await?;
        if envelope.success {
            Ok(RegistrationOutcome::Accepted)
        } else {
            Ok(RegistrationOutcome::Rejected {
                message: envelope
                    .error
                    .unwrap_or_else(|| "registration rejected".to_owned()),
            })
        }
    }

    async fn execute(
        &self,
        agent_id: &AgentId,
        request: &ExecutionRequest,
    ) -> AgentServiceResult<ExecutionData> {
        let url = format!("{}/agents/{agent_id}/execute", self.config.base_url);
        debug!(%agent_id, "executing agent");
        let envelope: ServiceEnvelope<ExecutionData> = self
            .post_envelope(url, request, self.config.execute_timeout)
            .await?;
        if envelope.success {
            envelope.data.ok_or_else(|| {
                AgentServiceError::Transport("execution response carried no data".to_owned())
            })
        } else {
            Err(AgentServiceError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| "execution rejected".to_owned()),
            ))
        }
    }

    async fn token_map(&self) -> AgentServiceResult<BTreeMap<TokenId, AgentId>> {
        let url = format!("{}/agents/token-map", self.config.base_url);
        let envelope: ServiceEnvelope<BTreeMap<String, String>> = self
            .get_envelope(url, self.config.token_map_timeout)
            .await?;
        if !envelope.success {
            return Err(AgentServiceError::Transport(
                envelope
                    .error
                    .unwrap_or_else(|| "token map fetch rejected".to_owned()),
            ));
        }
        let entries = envelope.data.unwrap_or_default();
        let mut map = BTreeMap::new();
        for (raw_token, agent_id) in entries {
            match raw_token.trim().parse::<u64>() {
                Ok(token) => {
                    map.insert(TokenId::new(token), AgentId::from_wire(agent_id));
                }
                Err(_) => warn!(%raw_token, "skipping unparseable token map key"),
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AgentServiceConfig, DEFAULT_EXECUTE_TIMEOUT, DEFAULT_REGISTER_TIMEOUT, ServiceEnvelope,
    };
    use std::time::Duration;

    #[test]
    fn base_url_is_stored_without_trailing_slash() {
        let config = AgentServiceConfig::new("https://agents.example/api/");
        assert_eq!(config.base_url(), "https://agents.example/api");
    }

    #[test]
    fn default_timeouts_match_the_service_contract() {
        let config = AgentServiceConfig::new("https://agents.example");
        assert_eq!(config.register_timeout, DEFAULT_REGISTER_TIMEOUT);
        assert_eq!(config.register_timeout, Duration::from_secs(30));
        assert_eq!(config.execute_timeout, DEFAULT_EXECUTE_TIMEOUT);
    }

    #[test]
    fn timeout_overrides_are_applied() {
        let config = AgentServiceConfig::new("https://agents.example")
            .with_register_timeout(Duration::from_secs(5))
            .with_execute_timeout(Duration::from_secs(90));
        assert_eq!(config.register_timeout, Duration::from_secs(5));
        assert_eq!(config.execute_timeout, Duration::from_secs(90));
    }

    #[test]
    fn envelope_tolerates_missing_data_and_error() {
        let envelope: ServiceEnvelope<serde_json::Value> =
            serde_json::from_value(serde_json::json!({"success": true})).expect("valid envelope");
        assert!(envelope.success);
        assert!(envelope.data.is_none());
        assert!(envelope.error.is_none());
    }
}
