//! C# front end using tree-sitter
//!
//! Builds the namespace and type symbols of one file. Namespace levels are
//! recorded segment by segment so that `namespace A.B` and
//! `namespace A { namespace B }` produce the same symbols with different
//! declaration spans.

use super::{node_location, node_span};
use crate::semantic::{
    Accessibility, CompilationModel, NamespaceId, TextSpan, TypeDeclaration, TypeId, TypeKind,
};
use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

const NAMESPACE_DECLARATION: &str = "namespace_declaration";
const FILE_SCOPED_NAMESPACE_DECLARATION: &str = "file_scoped_namespace_declaration";

/// Parse C# source into a syntax tree
pub fn parse_tree(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    let language = tree_sitter_c_sharp::LANGUAGE;
    parser
        .set_language(&language.into())
        .context("Failed to set C# language")?;

    parser
        .parse(source, None)
        .context("Failed to parse C# source")
}

/// Model C# source directly (useful for testing)
pub fn build_model(source: &str, path: &Path) -> Result<CompilationModel> {
    let tree = parse_tree(source)?;
    let root = tree.root_node();

    let mut builder = ModelBuilder {
        source: source.as_bytes(),
        path,
        model: CompilationModel::new(),
    };
    builder.walk_declarations(root, NamespaceId::GLOBAL, None);
    builder.model.set_has_errors(root.has_error());

    Ok(builder.model)
}

struct ModelBuilder<'a> {
    source: &'a [u8],
    path: &'a Path,
    model: CompilationModel,
}

impl ModelBuilder<'_> {
    fn walk_declarations(
        &mut self,
        node: Node,
        namespace: NamespaceId,
        containing_type: Option<TypeId>,
    ) {
        let mut current = namespace;

        for child in node.named_children(&mut node.walk()) {
            match child.kind() {
                NAMESPACE_DECLARATION => {
                    let inner = self.enter_namespace(&child, current);
                    if let Some(body) = child.child_by_field_name("body") {
                        self.walk_declarations(body, inner, None);
                    }
                }
                FILE_SCOPED_NAMESPACE_DECLARATION => {
                    // Members may be children of the declaration or its
                    // following siblings depending on the grammar version.
                    let inner = self.enter_namespace(&child, current);
                    self.walk_declarations(child, inner, None);
                    current = inner;
                }
                kind => match type_kind(kind) {
                    Some(type_kind) => {
                        self.declare_type(&child, type_kind, current, containing_type);
                    }
                    None => self.walk_declarations(child, current, containing_type),
                },
            }
        }
    }

    /// Declare every segment of a namespace name and return the innermost level.
    fn enter_namespace(&mut self, decl: &Node, parent: NamespaceId) -> NamespaceId {
        let Some(name) = decl.child_by_field_name("name") else {
            return parent;
        };

        let mut segments = Vec::new();
        collect_segments(&name, self.source, &mut segments);

        segments
            .into_iter()
            .fold(parent, |ns, (segment, span)| {
                self.model
                    .declare_namespace(ns, unescape_identifier(&segment), span)
            })
    }

    fn declare_type(
        &mut self,
        node: &Node,
        kind: TypeKind,
        namespace: NamespaceId,
        containing_type: Option<TypeId>,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let Ok(name) = name_node.utf8_text(self.source) else {
            return;
        };

        let modifiers = modifiers(node, self.source);
        let id = self.model.declare_type(TypeDeclaration {
            name: unescape_identifier(name).to_string(),
            kind,
            accessibility: accessibility_from_modifiers(&modifiers),
            containing_type,
            namespace,
            location: node_location(&name_node, self.path),
            arity: type_arity(node),
            is_partial: modifiers.contains(&"partial"),
        });

        if matches!(kind, TypeKind::Enum | TypeKind::Delegate) {
            return;
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.walk_declarations(body, namespace, Some(id));
        }
    }
}

fn type_kind(node_kind: &str) -> Option<TypeKind> {
    match node_kind {
        "class_declaration" => Some(TypeKind::Class),
        "struct_declaration" => Some(TypeKind::Struct),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        "record_declaration" | "record_struct_declaration" => Some(TypeKind::Record),
        "delegate_declaration" => Some(TypeKind::Delegate),
        _ => None,
    }
}

/// Flatten a (possibly qualified) name node into its identifier segments.
///
/// Segments keep their written text (`@class` stays `@class`); comments
/// and other extras inside the name are skipped.
fn collect_segments(node: &Node, source: &[u8], out: &mut Vec<(String, TextSpan)>) {
    match node.kind() {
        "qualified_name" => {
            for child in node.named_children(&mut node.walk()) {
                collect_segments(&child, source, out);
            }
        }
        "identifier" => {
            if let Ok(text) = node.utf8_text(source) {
                out.push((text.trim().to_string(), node_span(node)));
            }
        }
        _ => {}
    }
}

/// Symbol name of an identifier token (`@class` names `class`)
pub(crate) fn unescape_identifier(text: &str) -> &str {
    text.strip_prefix('@').unwrap_or(text)
}

/// Modifier keywords written on a declaration
fn modifiers<'s>(node: &Node, source: &'s [u8]) -> Vec<&'s str> {
    let mut found = Vec::new();
    for child in node.children(&mut node.walk()) {
        if child.kind() == "modifier" {
            if let Ok(text) = child.utf8_text(source) {
                found.push(text.trim());
            }
        }
    }
    found
}

/// Map written modifiers to declared accessibility
pub(crate) fn accessibility_from_modifiers(modifiers: &[&str]) -> Accessibility {
    let has = |m: &str| modifiers.contains(&m);

    match (has("public"), has("protected"), has("internal"), has("private")) {
        (true, _, _, _) => Accessibility::Public,
        (_, true, true, _) => Accessibility::ProtectedOrInternal,
        (_, true, _, true) => Accessibility::ProtectedAndInternal,
        (_, true, _, _) => Accessibility::Protected,
        (_, _, true, _) => Accessibility::Internal,
        (_, _, _, true) => Accessibility::Private,
        _ => Accessibility::NotApplicable,
    }
}

/// Number of generic type parameters (`Foo<T, U>` has arity 2)
fn type_arity(node: &Node) -> usize {
    node.child_by_field_name("type_parameters")
        .map(|list| {
            list.named_children(&mut list.walk())
                .filter(|c| c.kind() == "type_parameter")
                .count()
        })
        .unwrap_or(0)
}

/// A namespace declaration found in the syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    /// The name as written (`ConsoleApp.Sub`)
    pub name: String,
    /// Span of the name node only
    pub name_span: TextSpan,
    /// Identifier segments in order
    pub segments: Vec<String>,
    /// `namespace A.B;` form
    pub file_scoped: bool,
    /// Span of the whole declaration
    pub span: TextSpan,
}

/// Walk up from `offset` to the nearest enclosing namespace declaration.
///
/// Returns `None` when the offset lies outside the source or no namespace
/// declaration encloses it.
pub fn find_enclosing_namespace(
    tree: &Tree,
    source: &str,
    offset: usize,
) -> Option<NamespaceDeclaration> {
    if offset > source.len() {
        return None;
    }

    let root = tree.root_node();
    let mut current = root.descendant_for_byte_range(offset, offset);
    while let Some(node) = current {
        if matches!(
            node.kind(),
            NAMESPACE_DECLARATION | FILE_SCOPED_NAMESPACE_DECLARATION
        ) {
            return namespace_declaration(&node, source.as_bytes());
        }
        current = node.parent();
    }

    // File-scoped namespace whose members are its siblings
    let preceding = root
        .named_children(&mut root.walk())
        .filter(|c| c.kind() == FILE_SCOPED_NAMESPACE_DECLARATION && c.start_byte() <= offset)
        .last();
    preceding.and_then(|node| namespace_declaration(&node, source.as_bytes()))
}

fn namespace_declaration(node: &Node, source: &[u8]) -> Option<NamespaceDeclaration> {
    let name = node.child_by_field_name("name")?;
    let text = name.utf8_text(source).ok()?;

    let mut segments = Vec::new();
    collect_segments(&name, source, &mut segments);

    Some(NamespaceDeclaration {
        name: text.to_string(),
        name_span: node_span(&name),
        segments: segments.into_iter().map(|(s, _)| s).collect(),
        file_scoped: node.kind() == FILE_SCOPED_NAMESPACE_DECLARATION,
        span: node_span(node),
    })
}
