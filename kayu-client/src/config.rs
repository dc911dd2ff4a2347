//! Client configuration.
//!
//! Settings here apply to every operation a client sends. Per-operation
//! headers and timeouts are set on the
//! [`OperationBuilder`](crate::OperationBuilder) instead.

use std::time::Duration;

/// Settings shared by every operation a [`GraphQLClient`](crate::GraphQLClient) sends.
#[derive(Debug, Clone)]
pub struct GraphQLClientConfig {
    /// URL operations are posted to.
    pub endpoint: String,
    /// Timeout for a whole exchange, unless the operation overrides it.
    pub timeout: Duration,
    /// Headers sent with every operation, in order. Repeated names are all sent.
    pub default_headers: Vec<(String, String)>,
    /// Defaults to `kayu-client/<version>`.
    pub user_agent: String,
}

impl Default for GraphQLClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000/graphql".to_string(),
            timeout: Duration::from_secs(30),
            default_headers: Vec::new(),
            user_agent: format!("kayu-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GraphQLClientConfig {
    /// Start from the defaults.
    pub fn builder() -> GraphQLClientConfigBuilder {
        GraphQLClientConfigBuilder::default()
    }

    /// Defaults with the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}

/// Builder for [`GraphQLClientConfig`].
#[derive(Debug, Default)]
pub struct GraphQLClientConfigBuilder {
    config: GraphQLClientConfig,
}

impl GraphQLClientConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Send a header with every operation.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .default_headers
            .push((name.into(), value.into()));
        self
    }

    /// Send `Authorization: Bearer <token>` with every operation.
    pub fn bearer_auth(self, token: impl Into<String>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.into()))
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> GraphQLClientConfig {
        self.config
    }
}
