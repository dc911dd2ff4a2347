//! GraphQL client implementation.

use std::sync::Arc;
use std::time::Duration;

use kayu_core::{OperationKind, SelectionSet};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::request::{GraphQLRequest, OperationBuilder};
use crate::transport::{HttpTransport, Transport};
use crate::{GraphQLClientConfig, GraphQLResponse, RequestError, Response, Result};

/// GraphQL client.
///
/// Sends selection sets through a [`Transport`] and decodes the responses
/// with the same selection sets.
pub struct GraphQLClient<C = HttpTransport> {
    transport: Arc<C>,
    config: Arc<GraphQLClientConfig>,
}

impl<C> Clone for GraphQLClient<C> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
        }
    }
}

impl GraphQLClient<HttpTransport> {
    /// Create a new GraphQL client with the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_config(GraphQLClientConfig::new(endpoint))
    }

    /// Create a new GraphQL client with custom configuration.
    pub fn with_config(config: GraphQLClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<C: Transport> GraphQLClient<C> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: GraphQLClientConfig, transport: C) -> Self {
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &GraphQLClientConfig {
        &self.config
    }

    /// Get the transport.
    pub fn transport(&self) -> &C {
        &self.transport
    }

    /// Create a query builder.
    pub fn query<'a, L, T>(
        &'a self,
        selection: &'a SelectionSet<L, T>,
    ) -> OperationBuilder<'a, L, T, C> {
        OperationBuilder::new(self, selection, OperationKind::Query)
    }

    /// Create a mutation builder.
    pub fn mutation<'a, L, T>(
        &'a self,
        selection: &'a SelectionSet<L, T>,
    ) -> OperationBuilder<'a, L, T, C> {
        OperationBuilder::new(self, selection, OperationKind::Mutation)
    }

    /// Execute a request and decode its data with `selection`.
    pub(crate) async fn execute<L, T>(
        &self,
        selection: &SelectionSet<L, T>,
        request: &GraphQLRequest,
        headers: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<Response<T>> {
        debug!(
            operation = request.operation_name.as_deref().unwrap_or("<anonymous>"),
            variables = request.variables.len(),
            "Executing GraphQL request"
        );
        trace!(query = %request.query, "GraphQL document");

        let response = self.transport.perform(request, headers, timeout).await?;
        decode_response(selection, response)
    }
}

/// Decode a response body, multiplexing server errors with the data.
pub(crate) fn decode_response<L, T>(
    selection: &SelectionSet<L, T>,
    response: GraphQLResponse,
) -> Result<Response<T>> {
    let errors = response.errors.unwrap_or_default();
    let data = response.data.unwrap_or(Value::Null);

    if data.is_null() && !errors.is_empty() {
        warn!(count = errors.len(), "GraphQL response contained only errors");
        return Err(RequestError::GraphQL(errors));
    }

    let data = selection.decode(&data)?;
    if !errors.is_empty() {
        warn!(count = errors.len(), "GraphQL response contained errors");
    }

    Ok(Response { data, errors })
}
