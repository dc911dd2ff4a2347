//! Transports that carry a request to the server.

use std::time::Duration;

use async_trait::async_trait;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use kayu_core::DecodeError;
use reqwest::Client;
use tracing::debug;

use crate::request::GraphQLRequest;
use crate::{GraphQLClientConfig, GraphQLResponse, RequestError, Result};

/// Sends a request and returns the parsed response body.
///
/// Implementations perform exactly one exchange per call and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a request with extra headers and an optional timeout override.
    async fn perform(
        &self,
        request: &GraphQLRequest,
        headers: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<GraphQLResponse>;
}

/// JSON over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
    endpoint: String,
    default_headers: HeaderMap,
}

impl HttpTransport {
    /// Create a transport from client configuration.
    pub fn new(config: &GraphQLClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| RequestError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            default_headers: header_map(&config.default_headers)?,
        })
    }

    /// Endpoint requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(
        &self,
        request: &GraphQLRequest,
        headers: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<GraphQLResponse> {
        let mut all_headers = self.default_headers.clone();
        all_headers.extend(header_map(headers)?);
        all_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut http_request = self
            .http_client
            .post(&self.endpoint)
            .headers(all_headers);

        if let Some(timeout) = timeout {
            http_request = http_request.timeout(timeout);
        }

        let response = http_request.json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "GraphQL request failed");
            return Err(RequestError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let body: GraphQLResponse =
            serde_json::from_slice(&bytes).map_err(DecodeError::from)?;
        Ok(body)
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| RequestError::Config(format!("Invalid header name `{name}`: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| RequestError::Config(format!("Invalid value for header `{name}`: {e}")))?;
        map.append(name, value);
    }
    Ok(map)
}
