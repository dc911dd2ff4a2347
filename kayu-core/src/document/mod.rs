//! Query documents.
//!
//! A document is rendered from a list of [`Field`]s. Every provided argument
//! is lifted into a single variables declaration keyed by its content hash,
//! and every field is aliased by its name and argument hash so the same field
//! requested with different arguments never collides in the response.

pub mod argument;
pub mod field;

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

pub use argument::{Argument, arg, arg_opt, hash};
pub use field::{Field, composite, fragment, leaf};

/// Response key carrying the concrete type of an object.
pub const TYPENAME: &str = "__typename";

const INDENT: &str = "  ";

/// Kind of operation a document describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    /// Keyword used in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation ready to be sent: kind, optional name and selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub fields: Vec<Field>,
}

impl Operation {
    /// Create an anonymous operation.
    pub fn new(kind: OperationKind, fields: Vec<Field>) -> Self {
        Self {
            kind,
            name: None,
            fields,
        }
    }

    /// Set the operation name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Render the query text.
    pub fn document(&self) -> String {
        serialize(self.kind, &self.fields, self.name.as_deref())
    }

    /// Variables object bound to the document.
    pub fn variables(&self) -> Map<String, Value> {
        variables(&self.fields)
    }
}

/// Serialize a selection into a query document.
pub fn serialize(kind: OperationKind, fields: &[Field], operation_name: Option<&str>) -> String {
    let mut header = vec![kind.as_str().to_string()];
    if let Some(name) = operation_name {
        header.push(name.to_string());
    }

    let declarations: Vec<String> = bound_arguments(fields)
        .into_iter()
        .map(|arg| format!("${}: {}", arg.variable(), arg.ty()))
        .collect();
    if !declarations.is_empty() {
        header.push(format!("({})", declarations.join(", ")));
    }
    header.push("{".to_string());

    let mut document = header.join(" ");
    for field in fields {
        document.push('\n');
        write_field(&mut document, field, 1);
    }
    document.push_str("\n}");

    tracing::trace!(%kind, variables = declarations.len(), "Serialized document");
    document
}

/// Variables object for a selection, keyed by variable name.
///
/// Omitted arguments are left out; identical arguments share one entry.
pub fn variables(fields: &[Field]) -> Map<String, Value> {
    let mut variables = Map::new();
    for arg in bound_arguments(fields) {
        if let Some(value) = arg.value() {
            variables.insert(arg.variable(), value.clone());
        }
    }
    variables
}

/// Provided arguments of the whole tree in selection order, deduplicated by
/// variable name.
fn bound_arguments(fields: &[Field]) -> Vec<&Argument> {
    let mut all = Vec::new();
    collect_arguments(fields, &mut all);

    let mut seen = HashSet::new();
    all.into_iter()
        .filter(|arg| arg.is_provided())
        .filter(|arg| seen.insert(arg.variable()))
        .collect()
}

fn collect_arguments<'a>(fields: &'a [Field], into: &mut Vec<&'a Argument>) {
    for field in fields {
        into.extend(field.arguments());
        collect_arguments(field.selection(), into);
    }
}

fn write_field(out: &mut String, field: &Field, depth: usize) {
    out.push_str(&INDENT.repeat(depth));

    match field {
        Field::Leaf { name, arguments } => {
            out.push_str(&format!(
                "{}: {name}{}",
                field.alias().unwrap_or_default(),
                inline_arguments(arguments)
            ));
        }
        Field::Composite {
            name,
            arguments,
            selection,
        } => {
            out.push_str(&format!(
                "{}: {name}{} {{",
                field.alias().unwrap_or_default(),
                inline_arguments(arguments)
            ));
            write_selection(out, selection, depth);
        }
        Field::Fragment {
            type_condition,
            selection,
        } => {
            out.push_str(&format!("... on {type_condition} {{"));
            write_selection(out, selection, depth);
        }
    }
}

fn write_selection(out: &mut String, selection: &[Field], depth: usize) {
    out.push('\n');
    out.push_str(&INDENT.repeat(depth + 1));
    out.push_str(TYPENAME);
    for child in selection {
        out.push('\n');
        write_field(out, child, depth + 1);
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
}

fn inline_arguments(arguments: &[Argument]) -> String {
    let provided: Vec<String> = arguments
        .iter()
        .filter(|arg| arg.is_provided())
        .map(|arg| format!("{}: ${}", arg.name(), arg.variable()))
        .collect();

    if provided.is_empty() {
        String::new()
    } else {
        format!("({})", provided.join(", "))
    }
}
