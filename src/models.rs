//! Core data models for simple-namespace
//!
//! These models are what reporters render and what the findings cache
//! stores between `analyze` and `fix`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Generate a deterministic finding ID based on content hash.
///
/// Stable across runs so a finding keeps its ID as long as the rule, file,
/// line and message are unchanged. The ID is the first 16 hex characters of
/// an MD5 digest.
pub fn deterministic_finding_id(rule: &str, file: &str, line: u32, message: &str) -> String {
    let input = format!("{rule}\n{file}\n{line}\n{message}");
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

/// Severity levels for findings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "note" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(anyhow::anyhow!(
                "Unknown severity '{}'. Valid values: info, warning, error",
                s
            )),
        }
    }
}

/// A reported rule violation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Finding {
    #[serde(default)]
    pub id: String,
    /// Rule identifier, e.g. `SimpleNamespace`
    #[serde(default)]
    pub rule_id: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    /// Rendered message
    #[serde(default)]
    pub message: String,
    /// Message template parameters, in order
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub file: PathBuf,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    /// Byte offset of the reported span
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
    /// Title of the fix offered for this finding, if any
    #[serde(default)]
    pub fix_title: Option<String>,
}

impl Finding {
    /// Sort key used to make reports reproducible
    pub fn sort_key(&self) -> (&PathBuf, u32, u32, &str) {
        (&self.file, self.line, self.column, self.rule_id.as_str())
    }
}

/// Summary of findings by severity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindingsSummary {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub total: usize,
}

impl FindingsSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::Error => summary.error += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

/// Outcome of one analysis pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub version: String,
    pub root: PathBuf,
    pub files_analyzed: usize,
    pub findings: Vec<Finding>,
    pub findings_summary: FindingsSummary,
    /// Detector failures (name, error)
    #[serde(default)]
    pub failures: Vec<(String, String)>,
}

impl AnalysisReport {
    pub fn new(root: PathBuf, files_analyzed: usize, findings: Vec<Finding>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            root,
            files_analyzed,
            findings_summary: FindingsSummary::from_findings(&findings),
            findings,
            failures: Vec::new(),
        }
    }

    /// Whether any finding is at or above `threshold`
    pub fn has_findings_at_or_above(&self, threshold: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= threshold)
    }
}
