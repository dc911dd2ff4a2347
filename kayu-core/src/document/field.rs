//! Field AST recorded by selection sets.

use super::argument::{Argument, hash};

/// A single node of a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Scalar or enum selection.
    Leaf {
        name: String,
        arguments: Vec<Argument>,
    },
    /// Object selection with nested fields.
    Composite {
        name: String,
        arguments: Vec<Argument>,
        selection: Vec<Field>,
    },
    /// Type-conditioned sub-selection used to narrow unions and interfaces.
    Fragment {
        type_condition: String,
        selection: Vec<Field>,
    },
}

impl Field {
    /// Response key of the field, `{name}_{hash(arguments)}`.
    ///
    /// Fragments are spread into their parent and have no alias.
    pub fn alias(&self) -> Option<String> {
        match self {
            Self::Leaf { name, arguments } | Self::Composite { name, arguments, .. } => {
                Some(format!("{}_{}", name, hash(arguments)))
            }
            Self::Fragment { .. } => None,
        }
    }

    /// Hash of the field's own arguments. `None` for fragments.
    pub fn hash(&self) -> Option<String> {
        match self {
            Self::Leaf { arguments, .. } | Self::Composite { arguments, .. } => {
                Some(hash(arguments))
            }
            Self::Fragment { .. } => None,
        }
    }

    /// Field's own arguments; fragments have none.
    pub fn arguments(&self) -> &[Argument] {
        match self {
            Self::Leaf { arguments, .. } | Self::Composite { arguments, .. } => arguments,
            Self::Fragment { .. } => &[],
        }
    }

    /// Nested selection; empty for leaves.
    pub fn selection(&self) -> &[Field] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Composite { selection, .. } | Self::Fragment { selection, .. } => selection,
        }
    }
}

/// Create a leaf field.
pub fn leaf(name: impl Into<String>, arguments: Vec<Argument>) -> Field {
    Field::Leaf {
        name: name.into(),
        arguments,
    }
}

/// Create a composite field over a nested selection.
pub fn composite(name: impl Into<String>, selection: Vec<Field>, arguments: Vec<Argument>) -> Field {
    Field::Composite {
        name: name.into(),
        arguments,
        selection,
    }
}

/// Create a fragment on a concrete type.
pub fn fragment(type_condition: impl Into<String>, selection: Vec<Field>) -> Field {
    Field::Fragment {
        type_condition: type_condition.into(),
        selection,
    }
}
