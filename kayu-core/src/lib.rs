//! # Kayu Core
//!
//! Typed selection sets for GraphQL queries.
//!
//! A selection is written once, as a closure over a [`Fields`] accumulator.
//! The closure runs once with no data to discover which fields it selects,
//! which produces the query document, and again for every response to
//! decode the data the server returned. Fields are aliased by name and
//! argument hash, so one field selected with different arguments never
//! collides in the response.
//!
//! ## Quick Start
//!
//! ```rust
//! use kayu_core::{Fields, Id, OperationKind, arg, selection};
//!
//! struct Human;
//!
//! let name = selection(|fields: &mut Fields<'_, Human>| fields.leaf::<String>("name", Vec::new()));
//!
//! let query = selection(move |fields: &mut Fields<'_, ()>| {
//!     fields.composite("human", vec![arg("id", "ID!", Id::from("1000"))], &name)
//! });
//!
//! let operation = query.operation(OperationKind::Query);
//! assert!(operation.document().starts_with("query ($_"));
//! assert_eq!(query.mock(), "42");
//! ```

pub mod codec;
pub mod document;
mod error;
pub mod selection;

pub use codec::{Codec, Id};
pub use document::{
    Argument, Field, Operation, OperationKind, TYPENAME, arg, arg_opt, composite, fragment, hash,
    leaf, serialize, variables,
};
pub use error::{DecodeError, Result};
pub use selection::{Fields, Fragments, Mode, ResponseData, SelectionSet, selection};

// Re-export common types
pub use serde_json::Value as JsonValue;
