//! Field arguments and the content hash used to alias fields and variables.

use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::codec::Codec;

/// Number of hex characters kept from the SHA-256 digest.
const HASH_LEN: usize = 32;

/// A named, typed argument passed to a selected field.
///
/// The value is stored in its serialized (JSON) form. An argument without a
/// value is never bound as a variable, so the server falls back to the
/// argument's default.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    name: String,
    ty: String,
    value: Option<Value>,
}

impl Argument {
    /// Create an argument from an already serialized value.
    pub fn new(name: impl Into<String>, ty: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            value,
        }
    }

    /// Create an argument whose value is left to the server default.
    pub fn omitted(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, ty, None)
    }

    /// Argument name as declared on the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Protocol type signature, e.g. `ID!` or `[String!]`.
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Serialized value, if one was provided.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether the argument carries a value and should be bound.
    pub fn is_provided(&self) -> bool {
        self.value.is_some()
    }

    /// Content hash of this single argument.
    pub fn hash(&self) -> String {
        hash(std::slice::from_ref(self))
    }

    /// Name of the protocol variable this argument is bound to, without `$`.
    ///
    /// A hex digest may start with a digit, which is not a valid name start,
    /// hence the leading underscore.
    pub fn variable(&self) -> String {
        format!("_{}", self.hash())
    }
}

/// Create an argument from a codec value.
pub fn arg<T: Codec>(name: impl Into<String>, ty: impl Into<String>, value: T) -> Argument {
    Argument::new(name, ty, Some(value.serialize()))
}

/// Create an argument from an optional codec value. `None` omits the argument.
pub fn arg_opt<T: Codec>(
    name: impl Into<String>,
    ty: impl Into<String>,
    value: Option<T>,
) -> Argument {
    Argument::new(name, ty, value.map(|value| value.serialize()))
}

/// Stable content hash of an ordered argument list.
///
/// Only `(type, value)` pairs take part; names are ignored. The list is
/// encoded as canonical JSON (sorted object keys, no `value` key for an
/// omitted argument, so omission and an explicit `null` differ) and digested
/// with SHA-256, so structurally equal values hash equally regardless of how
/// they were built.
pub fn hash(args: &[Argument]) -> String {
    let entries: Vec<Value> = args
        .iter()
        .map(|arg| match &arg.value {
            Some(value) => json!({ "type": arg.ty, "value": value }),
            None => json!({ "type": arg.ty }),
        })
        .collect();

    let digest = Sha256::digest(canonical(&Value::Array(entries)).as_bytes());
    let mut digest = hex::encode(digest);
    digest.truncate(HASH_LEN);
    digest
}

/// Canonical JSON text of a value with object keys in sorted order.
fn canonical(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| format!("{}:{}", Value::String(key.clone()), canonical(&map[key])))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}
