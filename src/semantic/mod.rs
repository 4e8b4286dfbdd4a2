//! Read-only semantic view of a compilation unit
//!
//! The namespace rule never walks syntax trees directly. It asks a
//! [`SourceModel`] a handful of questions about a declared type:
//! - what its declared accessibility is
//! - whether it is nested inside another type
//! - which namespace encloses it, and that namespace's parent chain
//! - where each namespace level was introduced in the source text
//!
//! [`CompilationModel`] is the arena-backed implementation built by the C#
//! front end (see `parsers::csharp`). Tests may supply their own models.

mod model;

pub use model::{CompilationModel, NamespaceSymbol, TypeDeclaration, TypeKind, TypeSymbol};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Separator between namespace segments (`A.B.C`).
pub const NAMESPACE_SEPARATOR: char = '.';

/// Half-open byte range `[start, end)` into a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A span anchored to a file, with a 1-based line/column for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub span: TextSpan,
    /// 1-based line
    pub line: u32,
    /// 1-based column (bytes)
    pub column: u32,
}

/// Declared accessibility of a type, as written in source.
///
/// `NotApplicable` means no accessibility modifier was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    #[default]
    NotApplicable,
    Private,
    /// `private protected`
    ProtectedAndInternal,
    Protected,
    Internal,
    /// `protected internal`
    ProtectedOrInternal,
    Public,
}

impl std::fmt::Display for Accessibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Accessibility::NotApplicable => write!(f, "not applicable"),
            Accessibility::Private => write!(f, "private"),
            Accessibility::ProtectedAndInternal => write!(f, "private protected"),
            Accessibility::Protected => write!(f, "protected"),
            Accessibility::Internal => write!(f, "internal"),
            Accessibility::ProtectedOrInternal => write!(f, "protected internal"),
            Accessibility::Public => write!(f, "public"),
        }
    }
}

/// Handle to a type symbol inside a [`SourceModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

/// Handle to a namespace symbol inside a [`SourceModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(pub usize);

impl NamespaceId {
    /// The implicit root namespace. It has no name, no span and no parent.
    pub const GLOBAL: NamespaceId = NamespaceId(0);

    pub fn is_global(self) -> bool {
        self == Self::GLOBAL
    }
}

/// Inconsistencies in the data a [`SourceModel`] hands out.
///
/// These are defects of the model, not of the code being analyzed, and are
/// never recovered from by the rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown type symbol #{0}")]
    UnknownType(usize),

    #[error("unknown namespace symbol #{0}")]
    UnknownNamespace(usize),

    #[error("namespace '{namespace}' has no declaration span")]
    MissingSpan { namespace: String },
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Read-only queries over the declared types and namespaces of one
/// compilation unit.
///
/// Implementations must be `Send + Sync`: types are evaluated in parallel.
pub trait SourceModel: Send + Sync {
    /// Every declared type, in declaration order.
    fn types(&self) -> Vec<TypeId>;

    fn type_name(&self, ty: TypeId) -> ModelResult<&str>;

    fn accessibility(&self, ty: TypeId) -> ModelResult<Accessibility>;

    /// The type this one is nested in, if any.
    fn containing_type(&self, ty: TypeId) -> ModelResult<Option<TypeId>>;

    /// The innermost namespace enclosing the type.
    fn containing_namespace(&self, ty: TypeId) -> ModelResult<NamespaceId>;

    /// Primary declaration location (the identifier of the first declaration).
    fn type_location(&self, ty: TypeId) -> ModelResult<Location>;

    fn is_global_namespace(&self, ns: NamespaceId) -> bool {
        ns.is_global()
    }

    /// Full dot-joined name, e.g. `ConsoleApp.Sub`. Empty for the root.
    fn namespace_name(&self, ns: NamespaceId) -> ModelResult<String>;

    fn parent_namespace(&self, ns: NamespaceId) -> ModelResult<Option<NamespaceId>>;

    /// Span of the identifier token that introduced this namespace level.
    fn namespace_span(&self, ns: NamespaceId) -> ModelResult<TextSpan>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span_len() {
        let span = TextSpan::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(TextSpan::new(4, 4).is_empty());
    }

    #[test]
    fn test_global_namespace_sentinel() {
        assert!(NamespaceId::GLOBAL.is_global());
        assert!(!NamespaceId(3).is_global());
    }

    #[test]
    fn test_accessibility_display() {
        assert_eq!(Accessibility::ProtectedOrInternal.to_string(), "protected internal");
        assert_eq!(Accessibility::ProtectedAndInternal.to_string(), "private protected");
    }
}
