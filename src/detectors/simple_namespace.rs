//! SimpleNamespace detector
//!
//! Flags public types declared inside a flat multi-segment namespace such as
//! `namespace ConsoleApp.Sub { ... }`. Explicitly nested namespace blocks are
//! accepted. Every flagged type gets its own finding, located at the type's
//! identifier, and offers the "Make namespace simple" fix.

mod evaluator;

pub use evaluator::{evaluate, evaluate_all, NamespaceFinding};

use crate::detectors::base::{Detector, RuleDescriptor};
use crate::detectors::file_provider::FileProvider;
use crate::detectors::is_line_suppressed;
use crate::detectors::sink::{Diagnostic, DiagnosticSink, FindingCollector};
use crate::fixes::MAKE_NAMESPACE_SIMPLE;
use crate::models::{Finding, Severity};
use crate::parsers::csharp;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, error, info, warn};

pub const SIMPLE_NAMESPACE_RULE: RuleDescriptor = RuleDescriptor {
    id: "SimpleNamespace",
    title: "Namespace is too complex",
    message_format: "Namespace '{0}' is too complex for the public type '{1}'",
    description: "Public types should live in a namespace declared with a single segment, \
                  or in explicitly nested namespace blocks.",
    category: "Naming",
    default_severity: Severity::Warning,
    enabled_by_default: true,
};

pub struct SimpleNamespaceDetector;

impl SimpleNamespaceDetector {
    pub fn new() -> Self {
        Self
    }

    fn analyze_file(&self, path: &Path, source: &str, sink: &mut dyn DiagnosticSink) -> Result<()> {
        let model = match csharp::build_model(source, path) {
            Ok(model) => model,
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                return Ok(());
            }
        };
        if model.has_errors() {
            debug!("{} has syntax errors, analyzing recovered tree", path.display());
        }

        let findings = match evaluate_all(&model) {
            Ok(findings) => findings,
            Err(e) => {
                error!("Inconsistent model for {}: {}", path.display(), e);
                return Err(e).with_context(|| {
                    format!("Failed to evaluate namespaces in {}", path.display())
                });
            }
        };

        let lines: Vec<&str> = source.lines().collect();
        for finding in findings {
            let idx = finding.location.line.saturating_sub(1) as usize;
            let line = lines.get(idx).copied().unwrap_or("");
            let prev = idx.checked_sub(1).and_then(|i| lines.get(i).copied());
            if is_line_suppressed(line, prev) {
                debug!(
                    "Suppressed {} for {} at {}:{}",
                    SIMPLE_NAMESPACE_RULE.id,
                    finding.type_name,
                    path.display(),
                    finding.location.line
                );
                continue;
            }

            sink.report(Diagnostic {
                rule: &SIMPLE_NAMESPACE_RULE,
                location: finding.location,
                arguments: vec![finding.namespace, finding.type_name],
                fix: Some(&MAKE_NAMESPACE_SIMPLE),
            });
        }

        Ok(())
    }
}

impl Default for SimpleNamespaceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for SimpleNamespaceDetector {
    fn name(&self) -> &'static str {
        "simple-namespace"
    }

    fn description(&self) -> &'static str {
        "Detects public types declared in flat multi-segment namespaces"
    }

    fn rule(&self) -> &'static RuleDescriptor {
        &SIMPLE_NAMESPACE_RULE
    }

    fn detect(&self, files: &dyn FileProvider) -> Result<Vec<Finding>> {
        let repo_path = files.repo_path();
        let per_file: Vec<Vec<Finding>> = files
            .files_with_extension("cs")
            .into_par_iter()
            .map(|path| {
                let Some(source) = files.content(path) else {
                    return Ok(Vec::new());
                };
                let mut collector = FindingCollector::new(repo_path);
                self.analyze_file(path, &source, &mut collector)?;
                Ok(collector.into_findings())
            })
            .collect::<Result<_>>()?;

        let findings: Vec<Finding> = per_file.into_iter().flatten().collect();
        info!("SimpleNamespaceDetector found {} findings", findings.len());
        Ok(findings)
    }
}
