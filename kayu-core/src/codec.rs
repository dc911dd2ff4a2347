//! Scalar codecs.
//!
//! A codec tells the selection machinery three things about a scalar type:
//! what to return while collecting a selection ([`Codec::mock`]), how to read
//! it from a response ([`Codec::decode`]) and how to send it as an argument
//! ([`Codec::serialize`]).
//!
//! Built-in scalars map as follows:
//!
//! | GraphQL   | Rust          | mock    |
//! |-----------|---------------|---------|
//! | `ID`      | [`Id`]        | `"42"`  |
//! | `String`  | `String`      | `"42"`  |
//! | `Int`     | `i32`, `i64`  | `42`    |
//! | `Float`   | `f64`         | `3.14`  |
//! | `Boolean` | `bool`        | `true`  |
//!
//! Nullable and list types wrap another codec with `Option` and `Vec`.
//! Custom scalars implement the trait themselves; enums usually go through
//! [`enum_codec!`](crate::enum_codec).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DecodeError, Result};

/// Conversion between a Rust value and its JSON representation on the wire.
pub trait Codec: Sized {
    /// Placeholder returned while a selection is being collected.
    fn mock() -> Self;

    /// Decode a value from a response.
    fn decode(json: &Value) -> Result<Self>;

    /// Encode a value for use as an argument.
    fn serialize(&self) -> Value;
}

/// The `ID` scalar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub String);

impl Id {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Codec for Id {
    fn mock() -> Self {
        Self("42".to_string())
    }

    // Servers may send numeric IDs.
    fn decode(json: &Value) -> Result<Self> {
        match json {
            Value::String(id) => Ok(Self(id.clone())),
            Value::Number(id) => Ok(Self(id.to_string())),
            other => Err(DecodeError::invalid("ID", other)),
        }
    }

    fn serialize(&self) -> Value {
        Value::String(self.0.clone())
    }
}

impl Codec for String {
    fn mock() -> Self {
        "42".to_string()
    }

    fn decode(json: &Value) -> Result<Self> {
        json.as_str()
            .map(str::to_string)
            .ok_or_else(|| DecodeError::invalid("String", json))
    }

    fn serialize(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Codec for i64 {
    fn mock() -> Self {
        42
    }

    fn decode(json: &Value) -> Result<Self> {
        json.as_i64().ok_or_else(|| DecodeError::invalid("Int", json))
    }

    fn serialize(&self) -> Value {
        Value::from(*self)
    }
}

impl Codec for i32 {
    fn mock() -> Self {
        42
    }

    fn decode(json: &Value) -> Result<Self> {
        json.as_i64()
            .and_then(|value| i32::try_from(value).ok())
            .ok_or_else(|| DecodeError::invalid("Int", json))
    }

    fn serialize(&self) -> Value {
        Value::from(*self)
    }
}

impl Codec for f64 {
    #[allow(clippy::approx_constant)]
    fn mock() -> Self {
        3.14
    }

    fn decode(json: &Value) -> Result<Self> {
        json.as_f64().ok_or_else(|| DecodeError::invalid("Float", json))
    }

    fn serialize(&self) -> Value {
        Value::from(*self)
    }
}

impl Codec for bool {
    fn mock() -> Self {
        true
    }

    fn decode(json: &Value) -> Result<Self> {
        json.as_bool().ok_or_else(|| DecodeError::invalid("Boolean", json))
    }

    fn serialize(&self) -> Value {
        Value::Bool(*self)
    }
}

/// Untyped JSON, for scalars the caller wants to inspect by hand.
impl Codec for Value {
    fn mock() -> Self {
        Value::Null
    }

    fn decode(json: &Value) -> Result<Self> {
        Ok(json.clone())
    }

    fn serialize(&self) -> Value {
        self.clone()
    }
}

impl<T: Codec> Codec for Option<T> {
    fn mock() -> Self {
        None
    }

    fn decode(json: &Value) -> Result<Self> {
        match json {
            Value::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }

    fn serialize(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::serialize)
    }
}

impl<T: Codec> Codec for Vec<T> {
    fn mock() -> Self {
        Vec::new()
    }

    fn decode(json: &Value) -> Result<Self> {
        json.as_array()
            .ok_or_else(|| DecodeError::invalid("list", json))?
            .iter()
            .map(T::decode)
            .collect()
    }

    fn serialize(&self) -> Value {
        Value::Array(self.iter().map(T::serialize).collect())
    }
}

/// Implement [`Codec`] for a fieldless enum serialized by variant name.
///
/// The first listed variant is the mock.
///
/// ```rust
/// use kayu_core::{Codec, enum_codec};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Episode {
///     NewHope,
///     Empire,
/// }
///
/// enum_codec!(Episode {
///     NewHope => "NEWHOPE",
///     Empire => "EMPIRE",
/// });
///
/// assert_eq!(Episode::mock(), Episode::NewHope);
/// ```
#[macro_export]
macro_rules! enum_codec {
    ($ty:ident { $first:ident => $first_name:literal $(, $variant:ident => $name:literal)* $(,)? }) => {
        impl $crate::Codec for $ty {
            fn mock() -> Self {
                $ty::$first
            }

            fn decode(json: &$crate::JsonValue) -> $crate::Result<Self> {
                match json.as_str() {
                    Some($first_name) => Ok($ty::$first),
                    $(Some($name) => Ok($ty::$variant),)*
                    _ => Err($crate::DecodeError::invalid(stringify!($ty), json)),
                }
            }

            fn serialize(&self) -> $crate::JsonValue {
                match self {
                    $ty::$first => $crate::JsonValue::from($first_name),
                    $($ty::$variant => $crate::JsonValue::from($name),)*
                }
            }
        }
    };
}
