//! # Kayu Client
//!
//! Sends kayu selection sets to a GraphQL server and decodes the responses
//! with the same selection sets.
//!
//! ## Features
//!
//! - **One definition**: the selector that builds the query also decodes it
//! - **Collision-free aliases**: fields are keyed by name and argument hash
//! - **Partial success**: decoded data is returned together with server errors
//! - **Pluggable transport**: JSON over HTTP POST by default
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kayu_client::GraphQLClient;
//! use kayu_core::{Fields, Id, arg, selection};
//!
//! struct Human;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GraphQLClient::new("https://api.example.com/graphql")?;
//!
//!     let name = selection(|fields: &mut Fields<'_, Human>| {
//!         fields.leaf::<String>("name", Vec::new())
//!     });
//!     let query = selection(move |fields: &mut Fields<'_, ()>| {
//!         fields.composite("human", vec![arg("id", "ID!", Id::from("1000"))], &name)
//!     });
//!
//!     let response = client.query(&query).operation_name("Human").send().await?;
//!
//!     println!("Human: {}", response.data);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod transport;

pub use client::GraphQLClient;
pub use config::{GraphQLClientConfig, GraphQLClientConfigBuilder};
pub use error::{RequestError, Result};
pub use request::{GraphQLRequest, OperationBuilder};
pub use response::{
    ErrorLocation, GraphQLResponse, GraphQLResponseError, PathSegment, Response, format_path,
};
pub use transport::{HttpTransport, Transport};

// Re-export common types
pub use serde_json::Value as JsonValue;
