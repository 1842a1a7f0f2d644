//! Static types carried by predicate expression nodes
//!
//! The translator never inspects runtime values to decide how to treat a
//! node. Everything it needs (enum coercion, boolean members, query roots)
//! is read from these static types.

use std::fmt;
use std::sync::Arc;

/// An enum type with its variant table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Enum type name
    pub name: String,
    /// Variant names paired with their ordinals, in declaration order
    pub variants: Vec<(String, i64)>,
}

impl EnumType {
    /// Creates an enum type from `(name, ordinal)` pairs
    pub fn new(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = (impl Into<String>, i64)>,
    ) -> Self {
        Self {
            name: name.into(),
            variants: variants
                .into_iter()
                .map(|(variant, ordinal)| (variant.into(), ordinal))
                .collect(),
        }
    }

    /// Returns the variant name for an ordinal
    pub fn name_of(&self, ordinal: i64) -> Option<&str> {
        self.variants
            .iter()
            .find(|(_, o)| *o == ordinal)
            .map(|(name, _)| name.as_str())
    }

    /// Returns the ordinal for a variant name
    pub fn ordinal_of(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ordinal)| *ordinal)
    }
}

/// Static type of an expression node
#[derive(Debug, Clone, PartialEq)]
pub enum ExprType {
    Bool,
    Int,
    Double,
    String,
    /// Untyped host value
    Object,
    Enum(Arc<EnumType>),
    /// A list of the element type
    Collection(Box<ExprType>),
    /// A mapped entity, by type name
    Entity(String),
    /// A deferred query over the named element type
    Queryable(String),
}

impl ExprType {
    /// Creates a collection type
    pub fn collection_of(element: ExprType) -> Self {
        ExprType::Collection(Box::new(element))
    }

    /// Creates an enum type
    pub fn enumeration(enum_type: EnumType) -> Self {
        ExprType::Enum(Arc::new(enum_type))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ExprType::Bool)
    }

    /// Returns the enum definition if this is an enum type
    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            ExprType::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the element type name of a queryable
    pub fn queryable_element(&self) -> Option<&str> {
        match self {
            ExprType::Queryable(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprType::Bool => write!(f, "bool"),
            ExprType::Int => write!(f, "int"),
            ExprType::Double => write!(f, "double"),
            ExprType::String => write!(f, "string"),
            ExprType::Object => write!(f, "object"),
            ExprType::Enum(e) => write!(f, "enum {}", e.name),
            ExprType::Collection(inner) => write!(f, "[{}]", inner),
            ExprType::Entity(name) => write!(f, "{}", name),
            ExprType::Queryable(name) => write!(f, "queryable<{}>", name),
        }
    }
}

/// The type that declares a called method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaringKind {
    /// Deferred query operators (`Where`)
    Queryable,
    /// Static sequence operators taking the source as first argument
    Enumerable,
    /// String instance methods
    String,
    /// Instance methods of a list value
    Collection,
    Other(String),
}

impl fmt::Display for DeclaringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaringKind::Queryable => write!(f, "Queryable"),
            DeclaringKind::Enumerable => write!(f, "Enumerable"),
            DeclaringKind::String => write!(f, "String"),
            DeclaringKind::Collection => write!(f, "Collection"),
            DeclaringKind::Other(name) => write!(f, "{}", name),
        }
    }
}
