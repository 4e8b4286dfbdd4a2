//! Base detector trait and types
//!
//! This module defines the core abstractions for rule detection:
//! - `RuleDescriptor` describing a rule's identity and message template
//! - `Detector` trait that all detectors must implement
//! - `DetectorResult` for capturing execution results

use crate::detectors::file_provider::FileProvider;
use crate::models::{Finding, Severity};
use anyhow::Result;
use std::collections::HashMap;

/// Static metadata of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Fixed identifier, e.g. `SimpleNamespace`
    pub id: &'static str,
    pub title: &'static str,
    /// Message template with positional `{0}`, `{1}`, ... placeholders
    pub message_format: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub default_severity: Severity,
    pub enabled_by_default: bool,
}

impl RuleDescriptor {
    /// Render the message template with positional arguments
    pub fn format_message(&self, arguments: &[&str]) -> String {
        arguments
            .iter()
            .enumerate()
            .fold(self.message_format.to_string(), |message, (i, arg)| {
                message.replace(&format!("{{{i}}}"), arg)
            })
    }
}

/// Result from running a single detector
#[derive(Debug, Clone)]
pub struct DetectorResult {
    /// Name of the detector that produced these results
    pub detector_name: String,
    /// Findings produced by the detector
    pub findings: Vec<Finding>,
    /// Execution time in milliseconds
    pub duration_ms: u64,
    /// Whether the detector completed successfully
    pub success: bool,
    /// Error message if the detector failed
    pub error: Option<String>,
}

impl DetectorResult {
    /// Create a successful result
    pub fn success(detector_name: String, findings: Vec<Finding>, duration_ms: u64) -> Self {
        Self {
            detector_name,
            findings,
            duration_ms,
            success: true,
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(detector_name: String, error: String, duration_ms: u64) -> Self {
        Self {
            detector_name,
            findings: Vec::new(),
            duration_ms,
            success: false,
            error: Some(error),
        }
    }
}

/// Trait for all rule detectors
///
/// A detector owns one rule. It receives the files under analysis and
/// returns the findings for every violation it sees.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyDetector;
///
/// impl Detector for MyDetector {
///     fn name(&self) -> &'static str {
///         "my-detector"
///     }
///
///     fn description(&self) -> &'static str {
///         "Detects my specific issue"
///     }
///
///     fn rule(&self) -> &'static RuleDescriptor {
///         &MY_RULE
///     }
///
///     fn detect(&self, files: &dyn FileProvider) -> Result<Vec<Finding>> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Detector: Send + Sync {
    /// Unique identifier for this detector
    fn name(&self) -> &'static str;

    /// Human-readable description of what this detector finds
    fn description(&self) -> &'static str;

    /// The rule this detector reports under
    fn rule(&self) -> &'static RuleDescriptor;

    /// Run detection and return findings
    fn detect(&self, files: &dyn FileProvider) -> Result<Vec<Finding>>;

    /// Category of issues this detector finds
    fn category(&self) -> &'static str {
        self.rule().category
    }
}

/// Summary statistics from running all detectors
#[derive(Debug, Clone, Default)]
pub struct DetectionSummary {
    /// Total number of detectors run
    pub detectors_run: usize,
    /// Number of detectors that succeeded
    pub detectors_succeeded: usize,
    /// Number of detectors that failed
    pub detectors_failed: usize,
    /// Total findings across all detectors
    pub total_findings: usize,
    /// Findings by severity
    pub by_severity: HashMap<Severity, usize>,
    /// Total execution time in milliseconds
    pub total_duration_ms: u64,
}

impl DetectionSummary {
    /// Update summary with a detector result
    pub fn add_result(&mut self, result: &DetectorResult) {
        self.detectors_run += 1;
        self.total_duration_ms += result.duration_ms;

        if result.success {
            self.detectors_succeeded += 1;
            self.total_findings += result.findings.len();

            for finding in &result.findings {
                *self.by_severity.entry(finding.severity).or_insert(0) += 1;
            }
        } else {
            self.detectors_failed += 1;
        }
    }
}
