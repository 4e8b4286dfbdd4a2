//! Rule detectors
//!
//! This module provides the detector framework and the namespace rule.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DetectorEngine                          │
//! │  - Registers detectors                                      │
//! │  - Runs detectors in parallel (rayon)                       │
//! │  - Applies config overrides, sorts and caps findings        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Detector Trait                         │
//! │  - name(): Unique identifier                                │
//! │  - rule(): RuleDescriptor reported under                    │
//! │  - detect(files): Run detection, return findings            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │ SimpleNamespaceDetector                                     │
//! │  C# front end -> SourceModel -> evaluator -> DiagnosticSink │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use simple_namespace::detectors::{DetectorEngineBuilder, SimpleNamespaceDetector};
//! use std::sync::Arc;
//!
//! let engine = DetectorEngineBuilder::new()
//!     .workers(4)
//!     .detector(Arc::new(SimpleNamespaceDetector::new()))
//!     .build();
//!
//! let run = engine.run(&files)?;
//! ```

mod base;
mod engine;
pub mod file_provider;
pub mod sink;
mod simple_namespace;

// Re-export base types
pub use base::{DetectionSummary, Detector, DetectorResult, RuleDescriptor};

// Re-export engine
pub use engine::{DetectorEngine, DetectorEngineBuilder, EngineRun};

pub use file_provider::{FileProvider, SourceFiles};
pub use simple_namespace::{
    evaluate, evaluate_all, NamespaceFinding, SimpleNamespaceDetector, SIMPLE_NAMESPACE_RULE,
};

use std::sync::Arc;

/// Comment marker that silences a finding on its line or the next one
pub const SUPPRESSION_MARKER: &str = "simple-namespace:ignore";

/// Create the default set of detectors
pub fn default_detectors() -> Vec<Arc<dyn Detector>> {
    vec![Arc::new(SimpleNamespaceDetector::new())]
}

/// Every rule a default detector can report
pub fn all_rules() -> Vec<&'static RuleDescriptor> {
    default_detectors().iter().map(|d| d.rule()).collect()
}

/// Check whether a finding on `line` is suppressed.
///
/// Accepts the marker inline (`public class Foo { } // simple-namespace:ignore`)
/// or on a comment-only line directly above. A space after the colon is
/// tolerated.
pub fn is_line_suppressed(line: &str, prev_line: Option<&str>) -> bool {
    let suppression_pattern_alt = "simple-namespace: ignore";

    let line_lower = line.to_lowercase();
    if line_lower.contains(SUPPRESSION_MARKER) || line_lower.contains(suppression_pattern_alt) {
        return true;
    }

    if let Some(prev) = prev_line {
        let prev_lower = prev.trim().to_lowercase();
        // Only count if previous line is just a comment (not code + comment)
        if (prev_lower.starts_with("//") || prev_lower.starts_with("/*"))
            && (prev_lower.contains(SUPPRESSION_MARKER)
                || prev_lower.contains(suppression_pattern_alt))
        {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_suppression() {
        assert!(is_line_suppressed(
            "public class Foo { } // simple-namespace:ignore",
            None
        ));
        assert!(is_line_suppressed(
            "public class Foo { } // Simple-Namespace: Ignore",
            None
        ));
        assert!(!is_line_suppressed("public class Foo { }", None));
    }

    #[test]
    fn test_previous_line_suppression() {
        assert!(is_line_suppressed(
            "public class Foo { }",
            Some("    // simple-namespace:ignore")
        ));
        assert!(is_line_suppressed(
            "public class Foo { }",
            Some("/* simple-namespace:ignore */")
        ));
        // Code followed by a comment does not suppress the next line
        assert!(!is_line_suppressed(
            "public class Foo { }",
            Some("int x = 1; // simple-namespace:ignore")
        ));
    }

    #[test]
    fn test_default_rules() {
        let ids: Vec<&str> = all_rules().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["SimpleNamespace"]);
    }
}
