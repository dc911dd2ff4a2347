//! GraphQL request payloads and operation builders.

use std::time::Duration;

use kayu_core::{Operation, OperationKind, SelectionSet};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::transport::Transport;
use crate::{GraphQLClient, Response, Result};

/// GraphQL request payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLRequest {
    /// The rendered document.
    pub query: String,
    /// Operation name.
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    /// Variables keyed by argument hash.
    pub variables: Map<String, Value>,
}

impl GraphQLRequest {
    /// Create a request for a raw document with no variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: None,
            variables: Map::new(),
        }
    }

    /// Create a request from an operation, binding its arguments.
    pub fn from_operation(operation: &Operation) -> Self {
        Self {
            query: operation.document(),
            operation_name: operation.name.clone(),
            variables: operation.variables(),
        }
    }

    /// Set the operation name.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// Builder for a query or mutation over a selection set.
pub struct OperationBuilder<'a, L, T, C> {
    client: &'a GraphQLClient<C>,
    selection: &'a SelectionSet<L, T>,
    kind: OperationKind,
    operation_name: Option<String>,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
}

impl<'a, L, T, C: Transport> OperationBuilder<'a, L, T, C> {
    pub(crate) fn new(
        client: &'a GraphQLClient<C>,
        selection: &'a SelectionSet<L, T>,
        kind: OperationKind,
    ) -> Self {
        Self {
            client,
            selection,
            kind,
            operation_name: None,
            timeout: None,
            headers: Vec::new(),
        }
    }

    /// Set the operation name.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Set a custom timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header for this request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The operation this builder sends.
    pub fn operation(&self) -> Operation {
        let operation = self.selection.operation(self.kind);
        match &self.operation_name {
            Some(name) => operation.with_name(name.clone()),
            None => operation,
        }
    }

    /// The request payload, without sending it.
    pub fn request(&self) -> GraphQLRequest {
        GraphQLRequest::from_operation(&self.operation())
    }

    /// Execute the operation and decode the response.
    ///
    /// Data that decodes is returned even when the server also reported
    /// errors; see [`Response::into_result`].
    pub async fn send(self) -> Result<Response<T>> {
        let request = self.request();
        self.client
            .execute(self.selection, &request, &self.headers, self.timeout)
            .await
    }
}
