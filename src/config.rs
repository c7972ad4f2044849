//! Agent configuration.

use crate::models::QueryAgentCollection;

/// Agents service used when no host is configured.
pub const DEFAULT_AGENTS_HOST: &str = "https://api.agents.weaviate.io";

/// Environment variable overriding the agents service host.
pub const AGENTS_HOST_ENV: &str = "QUERY_AGENT_HOST";
/// Environment variable supplying a default system prompt.
pub const SYSTEM_PROMPT_ENV: &str = "QUERY_AGENT_SYSTEM_PROMPT";

/// Configuration shared by every call a [`QueryAgent`](crate::QueryAgent) makes.
///
/// Use the builder methods to customize it.
///
/// # Example
///
/// ```ignore
/// use query_agent::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_collections(["Products"])
///     .with_system_prompt("Answer in one sentence.");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Base URL of the agents service, without trailing slash
    pub agents_host: String,
    /// Prompt steering the agent's behaviour
    pub system_prompt: Option<String>,
    /// Collections used when a call does not name its own
    pub collections: Option<Vec<QueryAgentCollection>>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agents_host: DEFAULT_AGENTS_HOST.to_string(),
            system_prompt: None,
            collections: None,
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the agents service host.
    pub fn with_agents_host(mut self, host: impl Into<String>) -> Self {
        self.agents_host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the default collections.
    pub fn with_collections<I, C>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<QueryAgentCollection>,
    {
        self.collections = Some(collections.into_iter().map(Into::into).collect());
        self
    }

    /// Defaults overridden by `QUERY_AGENT_HOST` and
    /// `QUERY_AGENT_SYSTEM_PROMPT` when they are set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(host) = non_empty_var(AGENTS_HOST_ENV) {
            config = config.with_agents_host(host);
        }
        if let Some(prompt) = non_empty_var(SYSTEM_PROMPT_ENV) {
            config = config.with_system_prompt(prompt);
        }
        config
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.agents_host, path)
    }
}

pub(crate) fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(AGENTS_HOST_ENV);
        std::env::remove_var(SYSTEM_PROMPT_ENV);
    }

    #[test]
    fn test_agent_config_default() {
        let config = AgentConfig::default();
        assert_eq!(config.agents_host, "https://api.agents.weaviate.io");
        assert!(config.system_prompt.is_none());
        assert!(config.collections.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = AgentConfig::new()
            .with_agents_host("http://localhost:8080/")
            .with_system_prompt("Be brief.")
            .with_collections(["Products", "Reviews"]);

        assert_eq!(config.agents_host, "http://localhost:8080");
        assert_eq!(config.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(
            config.collections,
            Some(vec![
                QueryAgentCollection::from("Products"),
                QueryAgentCollection::from("Reviews"),
            ])
        );
        assert_eq!(
            config.endpoint("/query/ask"),
            "http://localhost:8080/query/ask"
        );
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_env();
        std::env::set_var(AGENTS_HOST_ENV, "http://agents.internal:9000");
        std::env::set_var(SYSTEM_PROMPT_ENV, "Only answer about shoes.");

        let config = AgentConfig::from_env();
        clear_env();

        assert_eq!(config.agents_host, "http://agents.internal:9000");
        assert_eq!(
            config.system_prompt.as_deref(),
            Some("Only answer about shoes.")
        );
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_blank_values() {
        clear_env();
        std::env::set_var(AGENTS_HOST_ENV, "  ");

        let config = AgentConfig::from_env();
        clear_env();

        assert_eq!(config, AgentConfig::default());
    }
}
