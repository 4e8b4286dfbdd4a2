//! Arena-backed [`SourceModel`] for a single compilation unit

use super::{
    Accessibility, Location, ModelError, ModelResult, NamespaceId, SourceModel, TextSpan, TypeId,
    NAMESPACE_SEPARATOR,
};
use std::collections::HashMap;

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Record,
    Delegate,
}

/// One namespace level. Merged by full name across declarations in the unit.
#[derive(Debug, Clone)]
pub struct NamespaceSymbol {
    /// Single segment (`Sub` for `ConsoleApp.Sub`); empty for the root
    pub name: String,
    pub parent: Option<NamespaceId>,
    /// Identifier span from the first declaration that introduced this level
    pub span: Option<TextSpan>,
}

/// A declared type, possibly assembled from several `partial` declarations.
#[derive(Debug, Clone)]
pub struct TypeSymbol {
    pub name: String,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    pub containing_type: Option<TypeId>,
    pub namespace: NamespaceId,
    pub location: Location,
    pub arity: usize,
    pub is_partial: bool,
}

/// Input for [`CompilationModel::declare_type`]
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    pub containing_type: Option<TypeId>,
    pub namespace: NamespaceId,
    pub location: Location,
    pub arity: usize,
    pub is_partial: bool,
}

type PartialKey = (NamespaceId, Option<TypeId>, String, usize);

#[derive(Debug, Clone)]
pub struct CompilationModel {
    namespaces: Vec<NamespaceSymbol>,
    types: Vec<TypeSymbol>,
    namespace_index: HashMap<(NamespaceId, String), NamespaceId>,
    partial_index: HashMap<PartialKey, TypeId>,
    has_errors: bool,
}

impl Default for CompilationModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilationModel {
    /// Create an empty model holding only the global namespace.
    pub fn new() -> Self {
        Self {
            namespaces: vec![NamespaceSymbol {
                name: String::new(),
                parent: None,
                span: None,
            }],
            types: Vec::new(),
            namespace_index: HashMap::new(),
            partial_index: HashMap::new(),
            has_errors: false,
        }
    }

    /// Whether the parser had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn set_has_errors(&mut self, has_errors: bool) {
        self.has_errors = has_errors;
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn namespace(&self, ns: NamespaceId) -> ModelResult<&NamespaceSymbol> {
        self.namespaces
            .get(ns.0)
            .ok_or(ModelError::UnknownNamespace(ns.0))
    }

    pub fn type_symbol(&self, ty: TypeId) -> ModelResult<&TypeSymbol> {
        self.types.get(ty.0).ok_or(ModelError::UnknownType(ty.0))
    }

    /// Enter one namespace level below `parent`.
    ///
    /// A level declared earlier keeps its original span; later declarations
    /// of the same level only resolve to it.
    pub fn declare_namespace(
        &mut self,
        parent: NamespaceId,
        segment: &str,
        span: TextSpan,
    ) -> NamespaceId {
        let key = (parent, segment.to_string());
        if let Some(&existing) = self.namespace_index.get(&key) {
            return existing;
        }

        let id = NamespaceId(self.namespaces.len());
        self.namespaces.push(NamespaceSymbol {
            name: segment.to_string(),
            parent: Some(parent),
            span: Some(span),
        });
        self.namespace_index.insert(key, id);
        id
    }

    /// Record a type declaration and return its symbol.
    ///
    /// `partial` declarations with the same container, name and arity share
    /// one symbol: the first declaration stays the primary location and the
    /// first explicit accessibility wins.
    pub fn declare_type(&mut self, decl: TypeDeclaration) -> TypeId {
        let key: PartialKey = (
            decl.namespace,
            decl.containing_type,
            decl.name.clone(),
            decl.arity,
        );

        if decl.is_partial {
            if let Some(&existing) = self.partial_index.get(&key) {
                let symbol = &mut self.types[existing.0];
                if symbol.accessibility == Accessibility::NotApplicable {
                    symbol.accessibility = decl.accessibility;
                }
                return existing;
            }
        }

        let id = TypeId(self.types.len());
        let is_partial = decl.is_partial;
        self.types.push(TypeSymbol {
            name: decl.name,
            kind: decl.kind,
            accessibility: decl.accessibility,
            containing_type: decl.containing_type,
            namespace: decl.namespace,
            location: decl.location,
            arity: decl.arity,
            is_partial,
        });
        if is_partial {
            self.partial_index.insert(key, id);
        }
        id
    }

    /// Find a type by its simple name (first match in declaration order).
    pub fn type_named(&self, name: &str) -> Option<TypeId> {
        self.types
            .iter()
            .position(|t| t.name == name)
            .map(TypeId)
    }

    /// Find a namespace by its full dot-joined name.
    pub fn namespace_named(&self, full_name: &str) -> Option<NamespaceId> {
        (0..self.namespaces.len())
            .map(NamespaceId)
            .find(|&ns| {
                self.qualified_name(ns)
                    .map(|name| name == full_name)
                    .unwrap_or(false)
            })
    }

    fn qualified_name(&self, ns: NamespaceId) -> ModelResult<String> {
        let mut segments = Vec::new();
        let mut current = Some(ns);
        while let Some(id) = current {
            let symbol = self.namespace(id)?;
            if !id.is_global() {
                segments.push(symbol.name.as_str());
            }
            current = symbol.parent;
        }
        segments.reverse();
        Ok(segments.join(&NAMESPACE_SEPARATOR.to_string()))
    }
}

impl SourceModel for CompilationModel {
    fn types(&self) -> Vec<TypeId> {
        (0..self.types.len()).map(TypeId).collect()
    }

    fn type_name(&self, ty: TypeId) -> ModelResult<&str> {
        Ok(self.type_symbol(ty)?.name.as_str())
    }

    fn accessibility(&self, ty: TypeId) -> ModelResult<Accessibility> {
        Ok(self.type_symbol(ty)?.accessibility)
    }

    fn containing_type(&self, ty: TypeId) -> ModelResult<Option<TypeId>> {
        Ok(self.type_symbol(ty)?.containing_type)
    }

    fn containing_namespace(&self, ty: TypeId) -> ModelResult<NamespaceId> {
        Ok(self.type_symbol(ty)?.namespace)
    }

    fn type_location(&self, ty: TypeId) -> ModelResult<Location> {
        Ok(self.type_symbol(ty)?.location.clone())
    }

    fn namespace_name(&self, ns: NamespaceId) -> ModelResult<String> {
        self.qualified_name(ns)
    }

    fn parent_namespace(&self, ns: NamespaceId) -> ModelResult<Option<NamespaceId>> {
        Ok(self.namespace(ns)?.parent)
    }

    fn namespace_span(&self, ns: NamespaceId) -> ModelResult<TextSpan> {
        self.namespace(ns)?
            .span
            .ok_or_else(|| ModelError::MissingSpan {
                namespace: self.qualified_name(ns).unwrap_or_default(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, namespace: NamespaceId, accessibility: Accessibility) -> TypeDeclaration {
        TypeDeclaration {
            name: name.to_string(),
            kind: TypeKind::Class,
            accessibility,
            containing_type: None,
            namespace,
            location: Location::default(),
            arity: 0,
            is_partial: false,
        }
    }

    #[test]
    fn test_namespace_levels_merge_by_name() {
        let mut model = CompilationModel::new();
        let a = model.declare_namespace(NamespaceId::GLOBAL, "A", TextSpan::new(10, 11));
        let b = model.declare_namespace(a, "B", TextSpan::new(12, 13));
        let a_again = model.declare_namespace(NamespaceId::GLOBAL, "A", TextSpan::new(50, 51));

        assert_eq!(a, a_again);
        assert_eq!(model.namespace_span(a).unwrap(), TextSpan::new(10, 11));
        assert_eq!(model.namespace_name(b).unwrap(), "A.B");
        assert_eq!(model.namespace_named("A.B"), Some(b));
        assert_eq!(model.namespace_count(), 3);
    }

    #[test]
    fn test_global_namespace_has_no_span() {
        let model = CompilationModel::new();
        assert_eq!(model.namespace_name(NamespaceId::GLOBAL).unwrap(), "");
        assert_eq!(model.parent_namespace(NamespaceId::GLOBAL).unwrap(), None);
        assert!(matches!(
            model.namespace_span(NamespaceId::GLOBAL),
            Err(ModelError::MissingSpan { .. })
        ));
    }

    #[test]
    fn test_partial_types_merge() {
        let mut model = CompilationModel::new();
        let mut first = decl("Foo", NamespaceId::GLOBAL, Accessibility::NotApplicable);
        first.is_partial = true;
        let mut second = decl("Foo", NamespaceId::GLOBAL, Accessibility::Public);
        second.is_partial = true;

        let a = model.declare_type(first);
        let b = model.declare_type(second);

        assert_eq!(a, b);
        assert_eq!(model.type_count(), 1);
        assert_eq!(model.accessibility(a).unwrap(), Accessibility::Public);
    }

    #[test]
    fn test_non_partial_duplicates_stay_separate() {
        let mut model = CompilationModel::new();
        let a = model.declare_type(decl("Foo", NamespaceId::GLOBAL, Accessibility::Public));
        let b = model.declare_type(decl("Foo", NamespaceId::GLOBAL, Accessibility::Public));
        assert_ne!(a, b);
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let model = CompilationModel::new();
        assert_eq!(model.type_name(TypeId(7)), Err(ModelError::UnknownType(7)));
        assert_eq!(
            model.parent_namespace(NamespaceId(9)),
            Err(ModelError::UnknownNamespace(9))
        );
    }
}
