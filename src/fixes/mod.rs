//! Rule-based fixes
//!
//! Deterministic fixes computed from a finding and the current file content.
//! A fix is expressed as a declarative [`TextEdit`]; nothing is written to
//! disk until the caller asks for it with [`apply_to_file`].

mod flatten;

pub use flatten::{flatten, FlattenOutcome, Flattened};

use crate::models::Finding;
use crate::parsers::csharp;
use crate::semantic::TextSpan;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A code action offered alongside a finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixAction {
    pub title: &'static str,
    /// Identical fixes share this key
    pub equivalence_key: &'static str,
    fix_all: bool,
}

impl FixAction {
    /// Whether one invocation may fix every occurrence at once
    pub fn supports_fix_all(&self) -> bool {
        self.fix_all
    }
}

/// Collapse a flat namespace to its first segment
pub const MAKE_NAMESPACE_SIMPLE: FixAction = FixAction {
    title: "Make namespace simple",
    equivalence_key: "CodeFixTitle",
    fix_all: false,
};

/// The code action registered for a rule, if it has one
pub fn fix_for_rule(rule_id: &str) -> Option<&'static FixAction> {
    match rule_id {
        "SimpleNamespace" => Some(&MAKE_NAMESPACE_SIMPLE),
        _ => None,
    }
}

#[derive(Error, Debug)]
pub enum FixError {
    /// The location no longer maps to what the finding described
    #[error("location {offset} no longer points at a namespace member; re-run analysis")]
    StaleLocation { offset: usize },

    #[error("failed to parse source: {0}")]
    Parse(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rule '{0}' has no automatic fix")]
    Unsupported(String),
}

/// Replace one span of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: TextSpan,
    pub new_text: String,
}

impl TextEdit {
    pub fn apply(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len() + self.new_text.len());
        out.push_str(&source[..self.span.start]);
        out.push_str(&self.new_text);
        out.push_str(&source[self.span.end..]);
        out
    }

    /// Unified diff of the lines touched by this edit
    pub fn unified_diff(&self, path: &Path, source: &str) -> String {
        let line_start = source[..self.span.start]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let line_end = source[self.span.end..]
            .find('\n')
            .map(|i| self.span.end + i)
            .unwrap_or(source.len());

        let old_block = &source[line_start..line_end];
        let new_block = format!(
            "{}{}{}",
            &source[line_start..self.span.start],
            self.new_text,
            &source[self.span.end..line_end]
        );
        let first_line = source[..line_start].matches('\n').count() + 1;
        let old_count = old_block.lines().count().max(1);
        let new_count = new_block.lines().count().max(1);

        let mut patch_lines = Vec::new();
        patch_lines.push(format!("--- a/{}", path.display()));
        patch_lines.push(format!("+++ b/{}", path.display()));
        patch_lines.push(format!(
            "@@ -{},{} +{},{} @@",
            first_line, old_count, first_line, new_count
        ));
        patch_lines.extend(old_block.lines().map(|l| format!("-{}", l)));
        patch_lines.extend(new_block.lines().map(|l| format!("+{}", l)));

        patch_lines.join("\n")
    }
}

/// A rule-based fix for one finding
#[derive(Debug, Clone)]
pub struct RuleFix {
    /// Human-readable title
    pub title: String,
    /// Explanation of the fix
    pub description: String,
    /// Repository-relative file the edit applies to
    pub file: PathBuf,
    /// The edit, when there is something to change
    pub edit: Option<TextEdit>,
    /// Code patch (unified diff format)
    pub patch: Option<String>,
}

impl RuleFix {
    /// Whether applying the fix changes the file
    pub fn is_applicable(&self) -> bool {
        self.edit.is_some()
    }
}

/// Generate a rule-based fix for a finding against the current file content
pub fn generate_rule_fix(finding: &Finding, repo_path: &Path) -> Result<RuleFix, FixError> {
    match finding.rule_id.as_str() {
        "SimpleNamespace" => fix_simple_namespace(finding, repo_path),
        other => Err(FixError::Unsupported(other.to_string())),
    }
}

fn fix_simple_namespace(finding: &Finding, repo_path: &Path) -> Result<RuleFix, FixError> {
    let full_path = repo_path.join(&finding.file);
    let source = fs::read_to_string(&full_path).map_err(|source| FixError::Io {
        path: full_path.clone(),
        source,
    })?;

    // The reported identifier must still be where the finding put it
    let reported = source
        .get(finding.offset..finding.offset + finding.length)
        .map(csharp::unescape_identifier);
    if let Some(type_name) = finding.arguments.get(1) {
        if reported != Some(type_name.as_str()) {
            return Err(FixError::StaleLocation {
                offset: finding.offset,
            });
        }
    }

    let title = MAKE_NAMESPACE_SIMPLE.title.to_string();
    match flatten(&source, finding.offset)? {
        FlattenOutcome::Flattened(flattened) => Ok(RuleFix {
            title,
            description: format!(
                "Rename namespace '{}' to '{}'",
                flattened.old_name, flattened.new_name
            ),
            file: finding.file.clone(),
            patch: Some(flattened.edit.unified_diff(&finding.file, &source)),
            edit: Some(flattened.edit),
        }),
        FlattenOutcome::AlreadySimple { namespace } => Ok(RuleFix {
            title,
            description: format!("Namespace '{}' already has a single segment", namespace),
            file: finding.file.clone(),
            edit: None,
            patch: None,
        }),
    }
}

/// Apply a single edit to a file on disk
pub fn apply_to_file(path: &Path, edit: &TextEdit) -> Result<(), FixError> {
    let io_err = |source| FixError::Io {
        path: path.to_path_buf(),
        source,
    };
    let source = fs::read_to_string(path).map_err(io_err)?;
    if edit.span.end > source.len()
        || !source.is_char_boundary(edit.span.start)
        || !source.is_char_boundary(edit.span.end)
    {
        return Err(FixError::StaleLocation {
            offset: edit.span.start,
        });
    }
    fs::write(path, edit.apply(&source)).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_action() {
        assert_eq!(MAKE_NAMESPACE_SIMPLE.title, "Make namespace simple");
        assert_eq!(MAKE_NAMESPACE_SIMPLE.equivalence_key, "CodeFixTitle");
        assert!(!MAKE_NAMESPACE_SIMPLE.supports_fix_all());
        assert_eq!(fix_for_rule("SimpleNamespace"), Some(&MAKE_NAMESPACE_SIMPLE));
        assert_eq!(fix_for_rule("Other"), None);
    }

    #[test]
    fn test_text_edit_apply() {
        let edit = TextEdit {
            span: TextSpan::new(10, 24),
            new_text: "ConsoleApp".to_string(),
        };
        assert_eq!(
            edit.apply("namespace ConsoleApp.Sub { }"),
            "namespace ConsoleApp { }"
        );
    }

    #[test]
    fn test_unified_diff_touches_one_line() {
        let source = "using System;\nnamespace ConsoleApp.Sub\n{\n}\n";
        let start = source.find("ConsoleApp.Sub").unwrap();
        let edit = TextEdit {
            span: TextSpan::new(start, start + "ConsoleApp.Sub".len()),
            new_text: "ConsoleApp".to_string(),
        };

        let diff = edit.unified_diff(Path::new("src/Foo.cs"), source);
        assert_eq!(
            diff,
            "--- a/src/Foo.cs\n+++ b/src/Foo.cs\n@@ -2,1 +2,1 @@\n-namespace ConsoleApp.Sub\n+namespace ConsoleApp"
        );
    }

    fn write_repo(source: &str) -> (tempfile::TempDir, Finding) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Foo.cs"), source).unwrap();
        let offset = source.find("Foo ").unwrap();
        let finding = Finding {
            rule_id: "SimpleNamespace".to_string(),
            arguments: vec!["ConsoleApp.Sub".to_string(), "Foo".to_string()],
            file: PathBuf::from("Foo.cs"),
            offset,
            length: 3,
            ..Default::default()
        };
        (dir, finding)
    }

    #[test]
    fn test_generate_and_apply_fix() {
        let (dir, finding) = write_repo("namespace ConsoleApp.Sub { public class Foo { } }");

        let fix = generate_rule_fix(&finding, dir.path()).unwrap();
        assert!(fix.is_applicable());
        assert_eq!(fix.title, "Make namespace simple");
        assert!(fix.patch.as_deref().unwrap().contains("+namespace ConsoleApp {"));

        let path = dir.path().join(&fix.file);
        apply_to_file(&path, fix.edit.as_ref().unwrap()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "namespace ConsoleApp { public class Foo { } }"
        );
    }

    #[test]
    fn test_verbatim_type_name_is_not_stale() {
        let source = "namespace ConsoleApp.Sub { public class @Foo { } }";
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Foo.cs"), source).unwrap();
        let finding = Finding {
            rule_id: "SimpleNamespace".to_string(),
            arguments: vec!["ConsoleApp.Sub".to_string(), "Foo".to_string()],
            file: PathBuf::from("Foo.cs"),
            offset: source.find("@Foo").unwrap(),
            length: 4,
            ..Default::default()
        };

        let fix = generate_rule_fix(&finding, dir.path()).unwrap();
        assert_eq!(fix.description, "Rename namespace 'ConsoleApp.Sub' to 'ConsoleApp'");
    }

    #[test]
    fn test_moved_identifier_is_stale() {
        let (dir, finding) = write_repo("namespace ConsoleApp.Sub { public class Foo { } }");
        std::fs::write(
            dir.path().join("Foo.cs"),
            "// edited\nnamespace ConsoleApp.Sub { public class Foo { } }",
        )
        .unwrap();

        assert!(matches!(
            generate_rule_fix(&finding, dir.path()),
            Err(FixError::StaleLocation { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let (dir, mut finding) = write_repo("namespace ConsoleApp.Sub { public class Foo { } }");
        finding.file = PathBuf::from("Gone.cs");
        assert!(matches!(
            generate_rule_fix(&finding, dir.path()),
            Err(FixError::Io { .. })
        ));
    }

    #[test]
    fn test_unknown_rule_is_unsupported() {
        let finding = Finding {
            rule_id: "Other".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            generate_rule_fix(&finding, Path::new(".")),
            Err(FixError::Unsupported(rule)) if rule == "Other"
        ));
    }
}
