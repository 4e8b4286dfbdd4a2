//! Namespace complexity predicate
//!
//! A namespace written as one flat multi-segment name (`namespace A.B`) is
//! complex for the public types it holds. The same logical depth written as
//! separate nested blocks (`namespace A { namespace B { } }`) is not. The
//! two forms are told apart by how far apart the declaring identifiers of a
//! namespace level and its parent sit in the source.

use crate::semantic::{
    Accessibility, Location, ModelResult, NamespaceId, SourceModel, TypeId, NAMESPACE_SEPARATOR,
};
use rayon::prelude::*;

/// Width of the separator between the identifiers of a flat name.
const SEPARATOR_WIDTH: usize = NAMESPACE_SEPARATOR.len_utf8();

/// A public type declared in a flat multi-segment namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceFinding {
    /// Full dotted namespace name, e.g. `ConsoleApp.Sub`
    pub namespace: String,
    pub type_name: String,
    /// Identifier of the type's first declaration
    pub location: Location,
}

/// Decide whether `ty` sits in a namespace that is too complex.
///
/// `Ok(None)` means nothing to report. An `Err` is an inconsistency of the
/// model itself and is returned untouched.
pub fn evaluate<M: SourceModel + ?Sized>(
    model: &M,
    ty: TypeId,
) -> ModelResult<Option<NamespaceFinding>> {
    if !is_public(model.accessibility(ty)?) {
        return Ok(None);
    }

    if has_parent_type(model, ty)? {
        return Ok(None);
    }

    let namespace = model.containing_namespace(ty)?;
    if has_easy_namespace(model, namespace)? {
        return Ok(None);
    }

    let Some(parent) = model.parent_namespace(namespace)? else {
        return Ok(None);
    };

    if is_nested_in(model, namespace, parent)? {
        return Ok(None);
    }

    Ok(Some(NamespaceFinding {
        namespace: model.namespace_name(namespace)?,
        type_name: model.type_name(ty)?.to_string(),
        location: model.type_location(ty)?,
    }))
}

/// Evaluate every declared type of `model` in parallel.
///
/// Findings come back in declaration order. The first model inconsistency
/// encountered aborts the whole unit.
pub fn evaluate_all<M: SourceModel + ?Sized>(model: &M) -> ModelResult<Vec<NamespaceFinding>> {
    let results: Vec<Option<NamespaceFinding>> = model
        .types()
        .into_par_iter()
        .map(|ty| evaluate(model, ty))
        .collect::<ModelResult<_>>()?;

    Ok(results.into_iter().flatten().collect())
}

fn is_public(accessibility: Accessibility) -> bool {
    matches!(
        accessibility,
        Accessibility::Public | Accessibility::Protected
    )
}

fn has_parent_type<M: SourceModel + ?Sized>(model: &M, ty: TypeId) -> ModelResult<bool> {
    Ok(model.containing_type(ty)?.is_some())
}

/// The root namespace and single-segment names are always easy.
fn has_easy_namespace<M: SourceModel + ?Sized>(
    model: &M,
    namespace: NamespaceId,
) -> ModelResult<bool> {
    if model.is_global_namespace(namespace) {
        return Ok(true);
    }
    Ok(!model
        .namespace_name(namespace)?
        .contains(NAMESPACE_SEPARATOR))
}

/// True when `namespace` was declared in its own block inside `parent`,
/// i.e. its identifier does not directly follow the parent's identifier
/// across a single separator.
fn is_nested_in<M: SourceModel + ?Sized>(
    model: &M,
    namespace: NamespaceId,
    parent: NamespaceId,
) -> ModelResult<bool> {
    let parent_span = model.namespace_span(parent)?;
    let span = model.namespace_span(namespace)?;
    Ok(parent_span.end + SEPARATOR_WIDTH != span.start)
}
