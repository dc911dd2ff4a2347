// Kayu - Typed GraphQL selection sets for Rust
//
// This library pairs every query with its decoder: a selection closure is
// run once to build the document and again for each response to read it.

// Re-export core functionality
pub use kayu_core::*;

// Re-export the HTTP client
#[cfg(feature = "client")]
pub use kayu_client;

#[cfg(feature = "client")]
pub use kayu_client::{
    GraphQLClient, GraphQLClientConfig, GraphQLRequest, GraphQLResponseError, HttpTransport,
    RequestError, Response, Transport,
};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Argument, Codec, DecodeError, Fields, Fragments, Id, Mode, OperationKind, SelectionSet,
        arg, arg_opt, selection,
    };

    pub use kayu_core::enum_codec;

    #[cfg(feature = "client")]
    pub use crate::{GraphQLClient, GraphQLClientConfig, RequestError, Response};
}
