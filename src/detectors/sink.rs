//! Diagnostic sink
//!
//! Rules never build report records themselves. They hand a rule, a location
//! and the message parameters to a [`DiagnosticSink`]; the sink decides what
//! becomes of them.

use crate::detectors::base::RuleDescriptor;
use crate::fixes::FixAction;
use crate::models::Finding;
use crate::semantic::Location;

/// One raw rule violation
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub rule: &'static RuleDescriptor,
    pub location: Location,
    /// Positional message parameters
    pub arguments: Vec<String>,
    pub fix: Option<&'static FixAction>,
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Sink that turns diagnostics into report [`Finding`]s.
///
/// Paths are recorded relative to `root` when possible.
pub struct FindingCollector {
    root: std::path::PathBuf,
    findings: Vec<Finding>,
}

impl FindingCollector {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            root: root.into(),
            findings: Vec::new(),
        }
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

impl DiagnosticSink for FindingCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        let Diagnostic {
            rule,
            location,
            arguments,
            fix,
        } = diagnostic;

        let args: Vec<&str> = arguments.iter().map(String::as_str).collect();
        let file = location
            .file
            .strip_prefix(&self.root)
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|_| location.file.clone());

        self.findings.push(Finding {
            id: String::new(),
            rule_id: rule.id.to_string(),
            severity: rule.default_severity,
            category: rule.category.to_string(),
            title: rule.title.to_string(),
            message: rule.format_message(&args),
            arguments,
            file,
            line: location.line,
            column: location.column,
            offset: location.span.start,
            length: location.span.len(),
            fix_title: fix.map(|f| f.title.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::simple_namespace::SIMPLE_NAMESPACE_RULE;
    use crate::fixes::MAKE_NAMESPACE_SIMPLE;
    use crate::semantic::TextSpan;
    use std::path::PathBuf;

    #[test]
    fn test_collector_renders_message_and_relative_path() {
        let mut sink = FindingCollector::new("/repo");
        sink.report(Diagnostic {
            rule: &SIMPLE_NAMESPACE_RULE,
            location: Location {
                file: PathBuf::from("/repo/src/Foo.cs"),
                span: TextSpan::new(40, 43),
                line: 3,
                column: 18,
            },
            arguments: vec!["ConsoleApp.Sub".into(), "Foo".into()],
            fix: Some(&MAKE_NAMESPACE_SIMPLE),
        });

        let findings = sink.into_findings();
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.rule_id, "SimpleNamespace");
        assert_eq!(f.category, "Naming");
        assert_eq!(
            f.message,
            "Namespace 'ConsoleApp.Sub' is too complex for the public type 'Foo'"
        );
        assert_eq!(f.file, PathBuf::from("src/Foo.cs"));
        assert_eq!((f.offset, f.length), (40, 3));
        assert_eq!(f.fix_title.as_deref(), Some(MAKE_NAMESPACE_SIMPLE.title));
    }
}
