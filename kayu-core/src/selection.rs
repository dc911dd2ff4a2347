//! Selection sets.
//!
//! A [`SelectionSet`] pairs a decoder closure with the fields that closure
//! selects. The same closure runs in two modes:
//!
//! - **Collecting**: no data is present. Every field accessor records the
//!   field it reads and returns a mock value. This happens once, when the
//!   selection set is built, and yields the query selection.
//! - **Decoding**: a response fragment is present. The accessors read the
//!   values stored under the aliases computed while collecting.
//!
//! Because selection happens with no data present, a decoder must select the
//! same fields no matter which mode it runs in.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::Codec;
use crate::document::{
    Argument, Field, Operation, OperationKind, TYPENAME, composite, fragment, hash, leaf,
};
use crate::error::{DecodeError, Result};

/// Traversal mode of a [`Fields`] accumulator.
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    /// Discovering the selection; no response data.
    Collecting,
    /// Extracting values from a response fragment.
    Decoding(ResponseData<'a>),
}

/// Read-only view over a response fragment.
#[derive(Debug, Clone, Copy)]
pub struct ResponseData<'a> {
    data: &'a Value,
}

impl<'a> ResponseData<'a> {
    pub fn new(data: &'a Value) -> Self {
        Self { data }
    }

    /// Value stored under `{key}_{hash}`.
    pub fn get(&self, key: &str, hash: &str) -> Result<&'a Value> {
        let object = self
            .data
            .as_object()
            .ok_or_else(|| DecodeError::invalid("object", self.data))?;
        let alias = format!("{key}_{hash}");

        object
            .get(&alias)
            .ok_or(DecodeError::MissingField { key: alias })
    }

    /// Concrete type of the fragment.
    pub fn typename(&self) -> Result<&'a str> {
        self.data
            .get(TYPENAME)
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingTypename)
    }

    /// The fragment converted into a caller-chosen shape.
    pub fn raw<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(self.data)?)
    }

    /// The untyped fragment.
    pub fn value(&self) -> &'a Value {
        self.data
    }
}

/// Accumulator handed to decoders.
///
/// `L` is the type lock: a marker naming the response shape this
/// accumulator reads. It only exists at the type level, so wrappers can
/// offer the right accessors for each object type.
pub struct Fields<'a, L> {
    mode: Mode<'a>,
    selection: Vec<Field>,
    _lock: PhantomData<fn() -> L>,
}

impl<'a, L> Fields<'a, L> {
    /// Accumulator in collecting mode.
    pub fn collecting() -> Self {
        Self {
            mode: Mode::Collecting,
            selection: Vec::new(),
            _lock: PhantomData,
        }
    }

    /// Accumulator in decoding mode over a response fragment.
    pub fn decoding(data: &'a Value) -> Self {
        Self {
            mode: Mode::Decoding(ResponseData::new(data)),
            selection: Vec::new(),
            _lock: PhantomData,
        }
    }

    pub fn mode(&self) -> Mode<'a> {
        self.mode
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.mode, Mode::Collecting)
    }

    /// Record a field. Ignored while decoding.
    pub fn select(&mut self, field: Field) {
        if self.is_collecting() {
            self.selection.push(field);
        }
    }

    /// Record several fields in order. Ignored while decoding.
    pub fn select_all(&mut self, fields: impl IntoIterator<Item = Field>) {
        if self.is_collecting() {
            self.selection.extend(fields);
        }
    }

    /// Fields recorded so far.
    pub fn selection(&self) -> &[Field] {
        &self.selection
    }

    pub fn into_selection(self) -> Vec<Field> {
        self.selection
    }

    /// Select a scalar or enum field and read it.
    pub fn leaf<S: Codec>(&mut self, name: &str, arguments: Vec<Argument>) -> Result<S> {
        let key = hash(&arguments);
        self.select(leaf(name, arguments));

        match self.mode {
            Mode::Collecting => Ok(S::mock()),
            Mode::Decoding(data) => S::decode(data.get(name, &key)?),
        }
    }

    /// Select an object field through a nested selection and read it.
    pub fn composite<M, T: Clone>(
        &mut self,
        name: &str,
        arguments: Vec<Argument>,
        selection: &SelectionSet<M, T>,
    ) -> Result<T> {
        let key = hash(&arguments);
        if self.is_collecting() {
            self.select(composite(name, selection.fields().to_vec(), arguments));
        }

        match self.mode {
            Mode::Collecting => Ok(selection.mock().clone()),
            Mode::Decoding(data) => selection.decode(data.get(name, &key)?),
        }
    }

    /// Narrow a union or interface to one of the offered concrete types.
    ///
    /// Collecting selects a fragment per type and returns the first type's
    /// mock. Decoding dispatches on `__typename`.
    pub fn on<T: Clone>(&mut self, fragments: Fragments<T>) -> Result<T> {
        let Some((_, first)) = fragments.cases.first() else {
            return Err(DecodeError::NoVariants);
        };

        match self.mode {
            Mode::Collecting => {
                let mock = first.mock().clone();
                for (type_condition, case) in &fragments.cases {
                    self.select(fragment(type_condition.as_str(), case.fields().to_vec()));
                }
                Ok(mock)
            }
            Mode::Decoding(data) => {
                let typename = data.typename()?;
                match fragments.cases.iter().find(|(ty, _)| ty == typename) {
                    Some((_, case)) => case.decode(data.value()),
                    None => Err(DecodeError::UnknownVariant {
                        typename: typename.to_string(),
                        expected: fragments.type_conditions(),
                    }),
                }
            }
        }
    }
}

impl<L> fmt::Debug for Fields<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fields")
            .field("mode", &self.mode)
            .field("selection", &self.selection)
            .finish()
    }
}

/// Type-erased selection set used for fragment dispatch.
trait Case<T>: Send + Sync {
    fn fields(&self) -> &[Field];
    fn mock(&self) -> &T;
    fn decode(&self, data: &Value) -> Result<T>;
}

impl<L, T> Case<T> for SelectionSet<L, T>
where
    T: Send + Sync,
{
    fn fields(&self) -> &[Field] {
        SelectionSet::fields(self)
    }

    fn mock(&self) -> &T {
        SelectionSet::mock(self)
    }

    fn decode(&self, data: &Value) -> Result<T> {
        SelectionSet::decode(self, data)
    }
}

/// Concrete types offered to a union or interface field, in order.
pub struct Fragments<T> {
    cases: Vec<(String, Box<dyn Case<T>>)>,
}

impl<T: Send + Sync + 'static> Fragments<T> {
    pub fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// Offer a selection for the given concrete type.
    pub fn case<L: 'static>(
        mut self,
        type_condition: impl Into<String>,
        selection: &SelectionSet<L, T>,
    ) -> Self {
        self.cases
            .push((type_condition.into(), Box::new(selection.clone())));
        self
    }
}

impl<T> Fragments<T> {
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    fn type_conditions(&self) -> Vec<String> {
        self.cases.iter().map(|(ty, _)| ty.clone()).collect()
    }
}

impl<T: Send + Sync + 'static> Default for Fragments<T> {
    fn default() -> Self {
        Self::new()
    }
}

type Decoder<L, T> = dyn Fn(&mut Fields<'_, L>) -> Result<T> + Send + Sync;

fn boxed<L, T, F>(decoder: F) -> Box<Decoder<L, T>>
where
    F: Fn(&mut Fields<'_, L>) -> Result<T> + Send + Sync + 'static,
{
    Box::new(decoder)
}

struct Inner<L, T> {
    decoder: Box<Decoder<L, T>>,
    fields: Vec<Field>,
    mock: T,
}

/// A decoder together with the selection it makes.
///
/// Cloning is cheap; clones share the decoder, selection and mock.
pub struct SelectionSet<L, T> {
    inner: Arc<Inner<L, T>>,
}

impl<L, T> Clone for SelectionSet<L, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L, T: fmt::Debug> fmt::Debug for SelectionSet<L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionSet")
            .field("fields", &self.inner.fields)
            .field("mock", &self.inner.mock)
            .finish()
    }
}

impl<L: 'static, T: 'static> SelectionSet<L, T> {
    /// Build a selection set by running `decoder` once in collecting mode.
    ///
    /// # Panics
    ///
    /// Panics if the decoder fails while collecting. Collecting reads no
    /// data, so such a failure is a bug in the decoder itself. Use
    /// [`SelectionSet::try_new`] to handle it instead.
    pub fn new<F>(decoder: F) -> Self
    where
        F: Fn(&mut Fields<'_, L>) -> Result<T> + Send + Sync + 'static,
    {
        match Self::try_new(decoder) {
            Ok(selection) => selection,
            Err(error) => panic!("decoder failed while collecting fields: {error}"),
        }
    }

    /// Build a selection set, returning the decoder's error if collecting fails.
    pub fn try_new<F>(decoder: F) -> Result<Self>
    where
        F: Fn(&mut Fields<'_, L>) -> Result<T> + Send + Sync + 'static,
    {
        let mut fields = Fields::collecting();
        let mock = decoder(&mut fields)?;

        Ok(Self::from_parts(boxed(decoder), fields.into_selection(), mock))
    }

    fn from_parts(decoder: Box<Decoder<L, T>>, fields: Vec<Field>, mock: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                decoder,
                fields,
                mock,
            }),
        }
    }

    /// A list of this selection.
    pub fn list(&self) -> SelectionSet<Vec<L>, Vec<T>>
    where
        T: Send + Sync,
    {
        let item = self.clone();
        let decoder = boxed(move |fields: &mut Fields<'_, Vec<L>>| -> Result<Vec<T>> {
            fields.select_all(item.fields().iter().cloned());

            match fields.mode() {
                Mode::Collecting => Ok(Vec::new()),
                Mode::Decoding(data) => data
                    .value()
                    .as_array()
                    .ok_or_else(|| DecodeError::invalid("list", data.value()))?
                    .iter()
                    .map(|element| item.decode(element))
                    .collect(),
            }
        });

        SelectionSet::from_parts(decoder, self.fields().to_vec(), Vec::new())
    }

    /// A nullable version of this selection.
    pub fn nullable(&self) -> SelectionSet<Option<L>, Option<T>>
    where
        T: Send + Sync,
    {
        let inner = self.clone();
        let decoder = boxed(move |fields: &mut Fields<'_, Option<L>>| -> Result<Option<T>> {
            fields.select_all(inner.fields().iter().cloned());

            match fields.mode() {
                Mode::Collecting => Ok(None),
                Mode::Decoding(data) if data.value().is_null() => Ok(None),
                Mode::Decoding(data) => inner.decode(data.value()).map(Some),
            }
        });

        SelectionSet::from_parts(decoder, self.fields().to_vec(), None)
    }

    /// Treat a nullable value as required, failing to decode on `null`.
    ///
    /// Use this only when the value is known to be present.
    pub fn non_null_or_fail(&self) -> SelectionSet<Option<L>, T>
    where
        T: Clone + Send + Sync,
    {
        let inner = self.clone();
        let decoder = boxed(move |fields: &mut Fields<'_, Option<L>>| -> Result<T> {
            fields.select_all(inner.fields().iter().cloned());

            match fields.mode() {
                Mode::Collecting => Ok(inner.mock().clone()),
                Mode::Decoding(data) if data.value().is_null() => Err(DecodeError::UnexpectedNull),
                Mode::Decoding(data) => inner.decode(data.value()),
            }
        });

        SelectionSet::from_parts(decoder, self.fields().to_vec(), self.mock().clone())
    }

    /// Transform decoded values without changing the selection.
    pub fn map<U, F>(&self, f: F) -> SelectionSet<L, U>
    where
        U: 'static,
        T: Clone + Send + Sync,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let mock = f(self.mock().clone());
        let inner = self.clone();
        let decoder = boxed(move |fields: &mut Fields<'_, L>| -> Result<U> {
            fields.select_all(inner.fields().iter().cloned());

            match fields.mode() {
                Mode::Collecting => Ok(f(inner.mock().clone())),
                Mode::Decoding(data) => inner.decode(data.value()).map(&f),
            }
        });

        SelectionSet::from_parts(decoder, self.fields().to_vec(), mock)
    }
}

impl<L, T> SelectionSet<L, T> {
    /// Fields selected by the decoder.
    pub fn fields(&self) -> &[Field] {
        &self.inner.fields
    }

    /// Value the decoder returned while collecting.
    pub fn mock(&self) -> &T {
        &self.inner.mock
    }

    /// Decode a response fragment.
    pub fn decode(&self, data: &Value) -> Result<T> {
        let mut fields = Fields::decoding(data);
        (self.inner.decoder)(&mut fields)
    }

    /// Run the decoder in collecting mode again on a fresh accumulator.
    pub fn collect(&self) -> Result<(Vec<Field>, T)> {
        let mut fields = Fields::collecting();
        let value = (self.inner.decoder)(&mut fields)?;
        Ok((fields.into_selection(), value))
    }

    /// Wrap the selection into an anonymous operation of the given kind.
    pub fn operation(&self, kind: OperationKind) -> Operation {
        Operation::new(kind, self.fields().to_vec())
    }
}

/// Shorthand for [`SelectionSet::new`].
pub fn selection<L, T, F>(decoder: F) -> SelectionSet<L, T>
where
    L: 'static,
    T: 'static,
    F: Fn(&mut Fields<'_, L>) -> Result<T> + Send + Sync + 'static,
{
    SelectionSet::new(decoder)
}
