//! Collapse a flat namespace declaration to its first segment
//!
//! `namespace ConsoleApp.Sub { ... }` becomes `namespace ConsoleApp { ... }`.
//! Only the name of the one declaration enclosing the finding is rewritten;
//! its body and every other declaration stay byte-for-byte identical.
//! References to the old name elsewhere are left alone.

use super::{FixError, TextEdit};
use crate::parsers::csharp::{self, NamespaceDeclaration};
use crate::semantic::NAMESPACE_SEPARATOR;

/// Result of a flatten request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlattenOutcome {
    Flattened(Flattened),
    /// The enclosing declaration already has a single segment
    AlreadySimple { namespace: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    pub old_name: String,
    pub new_name: String,
    pub edit: TextEdit,
    pub new_source: String,
}

/// Flatten the namespace declaration enclosing `offset`.
///
/// Fails with [`FixError::StaleLocation`] when `offset` is past the end of
/// `source` or no namespace declaration encloses it.
pub fn flatten(source: &str, offset: usize) -> Result<FlattenOutcome, FixError> {
    let tree = csharp::parse_tree(source).map_err(|e| FixError::Parse(format!("{:#}", e)))?;
    let declaration = csharp::find_enclosing_namespace(&tree, source, offset)
        .ok_or(FixError::StaleLocation { offset })?;

    let segments = segments(&declaration);
    let Some(first) = segments.first().filter(|_| segments.len() > 1) else {
        return Ok(FlattenOutcome::AlreadySimple {
            namespace: declaration.name,
        });
    };

    let edit = TextEdit {
        span: declaration.name_span,
        new_text: first.clone(),
    };
    let new_source = edit.apply(source);

    Ok(FlattenOutcome::Flattened(Flattened {
        old_name: declaration.name,
        new_name: first.clone(),
        edit,
        new_source,
    }))
}

fn segments(declaration: &NamespaceDeclaration) -> Vec<String> {
    if !declaration.segments.is_empty() {
        return declaration.segments.clone();
    }
    declaration
        .name
        .split(NAMESPACE_SEPARATOR)
        .map(|s| s.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::evaluate_all;
    use std::path::Path;

    fn flattened_source(source: &str, member: &str) -> String {
        let offset = source.find(member).expect("member in source");
        match flatten(source, offset).expect("flatten should succeed") {
            FlattenOutcome::Flattened(f) => f.new_source,
            other => panic!("expected a rewrite, got {:?}", other),
        }
    }

    #[test]
    fn test_flatten_public_class() {
        assert_eq!(
            flattened_source("namespace ConsoleApp.Sub { public class Foo { } }", "Foo"),
            "namespace ConsoleApp { public class Foo { } }"
        );
    }

    #[test]
    fn test_flatten_static_class() {
        assert_eq!(
            flattened_source(
                "namespace ConsoleApp.Sub { public static class FooExtensions { } }",
                "FooExtensions"
            ),
            "namespace ConsoleApp { public static class FooExtensions { } }"
        );
    }

    #[test]
    fn test_flatten_keeps_body_and_trivia() {
        let source = r#"using System;

namespace Company.Product.Feature
{
    // keep me
    public class Foo
    {
        public int Bar() => 42;
    }

    namespace Inner.Deep { internal class Hidden { } }
}
"#;
        let expected = source.replacen("Company.Product.Feature", "Company", 1);
        assert_eq!(flattened_source(source, "Foo"), expected);
    }

    #[test]
    fn test_flatten_only_innermost_declaration() {
        let source = "namespace Company { namespace Product.Feature { public class Foo { } } }";
        assert_eq!(
            flattened_source(source, "Foo"),
            "namespace Company { namespace Product { public class Foo { } } }"
        );
    }

    #[test]
    fn test_flatten_file_scoped() {
        let source = "namespace ConsoleApp.Sub;\n\npublic class Foo { }\n";
        assert_eq!(
            flattened_source(source, "Foo"),
            "namespace ConsoleApp;\n\npublic class Foo { }\n"
        );
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let source = "namespace ConsoleApp.Sub { public class Foo { } public struct Bar { } }";
        let fixed = flattened_source(source, "Foo");

        let model = csharp::build_model(&fixed, Path::new("Test.cs")).unwrap();
        assert!(evaluate_all(&model).unwrap().is_empty());

        let offset = fixed.find("Foo").unwrap();
        assert_eq!(
            flatten(&fixed, offset).unwrap(),
            FlattenOutcome::AlreadySimple {
                namespace: "ConsoleApp".to_string()
            }
        );
    }

    #[test]
    fn test_flatten_reports_edit() {
        let source = "namespace ConsoleApp.Sub { public class Foo { } }";
        let FlattenOutcome::Flattened(f) = flatten(source, source.find("Foo").unwrap()).unwrap()
        else {
            panic!("expected a rewrite");
        };
        assert_eq!(f.old_name, "ConsoleApp.Sub");
        assert_eq!(f.new_name, "ConsoleApp");
        assert_eq!(&source[f.edit.span.start..f.edit.span.end], "ConsoleApp.Sub");
    }

    #[test]
    fn test_stale_location() {
        let source = "public class Foo { }\nnamespace ConsoleApp.Sub { public class Bar { } }";
        assert!(matches!(
            flatten(source, source.find("Foo").unwrap()),
            Err(FixError::StaleLocation { .. })
        ));
        assert!(matches!(
            flatten(source, source.len() + 10),
            Err(FixError::StaleLocation { offset }) if offset == source.len() + 10
        ));
    }
}
