//! SARIF 2.1.0 reporter for GitHub Code Scanning and VS Code integration
//!
//! Generates SARIF (Static Analysis Results Interchange Format) output
//! compliant with OASIS SARIF 2.1.0 specification.
//!
//! Reference: https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use crate::detectors::{all_rules, RuleDescriptor};
use crate::models::{AnalysisReport, Finding, Severity};
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

/// SARIF schema URI
const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";

/// Map severity to SARIF level
fn severity_to_sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

// ============================================================================
// SARIF Data Structures
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
    invocations: Vec<SarifInvocation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    name: String,
    short_description: SarifMessage,
    full_description: SarifMessage,
    message_strings: HashMap<String, SarifMessage>,
    default_configuration: SarifConfiguration,
    properties: SarifRuleProperties,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifConfiguration {
    level: String,
    enabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRuleProperties {
    category: String,
    tags: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
    partial_fingerprints: HashMap<String, String>,
    properties: SarifResultProperties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fixes: Vec<SarifFix>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifArtifactLocation {
    uri: String,
    uri_base_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: u32,
    start_column: u32,
    char_offset: usize,
    char_length: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifInvocation {
    execution_successful: bool,
    end_time_utc: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_execution_notifications: Vec<SarifNotification>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifNotification {
    level: String,
    message: SarifMessage,
    descriptor: SarifDescriptor,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDescriptor {
    id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResultProperties {
    severity: String,
    category: String,
    arguments: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifFix {
    description: SarifMessage,
}

// ============================================================================
// Implementation
// ============================================================================

/// Render report as SARIF 2.1.0 JSON
pub fn render(report: &AnalysisReport) -> Result<String> {
    let sarif = build_sarif(report);
    Ok(serde_json::to_string_pretty(&sarif)?)
}

/// Build the complete SARIF document
fn build_sarif(report: &AnalysisReport) -> SarifReport {
    let rules: Vec<SarifRule> = all_rules().into_iter().map(build_rule).collect();
    let results: Vec<SarifResult> = report.findings.iter().map(build_result).collect();

    let notifications = report
        .failures
        .iter()
        .map(|(name, error)| SarifNotification {
            level: "error".to_string(),
            message: SarifMessage {
                text: format!("{}: {}", name, error),
            },
            descriptor: SarifDescriptor { id: name.clone() },
        })
        .collect();

    SarifReport {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "simple-namespace".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
            invocations: vec![SarifInvocation {
                execution_successful: report.failures.is_empty(),
                end_time_utc: Utc::now().to_rfc3339(),
                tool_execution_notifications: notifications,
            }],
        }],
    }
}

/// Build a SARIF rule from a rule descriptor
fn build_rule(rule: &RuleDescriptor) -> SarifRule {
    let mut message_strings = HashMap::new();
    message_strings.insert(
        "default".to_string(),
        SarifMessage {
            text: rule.message_format.to_string(),
        },
    );

    SarifRule {
        id: rule.id.to_string(),
        name: rule.id.to_string(),
        short_description: SarifMessage {
            text: rule.title.to_string(),
        },
        full_description: SarifMessage {
            text: rule.description.to_string(),
        },
        message_strings,
        default_configuration: SarifConfiguration {
            level: severity_to_sarif_level(rule.default_severity).to_string(),
            enabled: rule.enabled_by_default,
        },
        properties: SarifRuleProperties {
            category: rule.category.to_string(),
            tags: vec![rule.category.to_lowercase(), "maintainability".to_string()],
        },
    }
}

/// Build a SARIF result from a finding
fn build_result(finding: &Finding) -> SarifResult {
    let location = SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifactLocation {
                uri: finding.file.to_string_lossy().replace('\\', "/"),
                uri_base_id: "%SRCROOT%".to_string(),
            },
            region: SarifRegion {
                start_line: finding.line,
                start_column: finding.column,
                char_offset: finding.offset,
                char_length: finding.length,
            },
        },
    };

    let mut partial_fingerprints = HashMap::new();
    partial_fingerprints.insert("simpleNamespace/v1".to_string(), finding.id.clone());

    let fixes = finding
        .fix_title
        .as_ref()
        .map(|title| {
            vec![SarifFix {
                description: SarifMessage {
                    text: title.clone(),
                },
            }]
        })
        .unwrap_or_default();

    SarifResult {
        rule_id: finding.rule_id.clone(),
        level: severity_to_sarif_level(finding.severity).to_string(),
        message: SarifMessage {
            text: finding.message.clone(),
        },
        locations: vec![location],
        partial_fingerprints,
        properties: SarifResultProperties {
            severity: finding.severity.to_string(),
            category: finding.category.clone(),
            arguments: finding.arguments.clone(),
        },
        fixes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(severity_to_sarif_level(Severity::Error), "error");
        assert_eq!(severity_to_sarif_level(Severity::Warning), "warning");
        assert_eq!(severity_to_sarif_level(Severity::Info), "note");
    }

    #[test]
    fn test_sarif_document() {
        let sarif_json = render(&test_report()).expect("SARIF render should succeed");
        let sarif: serde_json::Value = serde_json::from_str(&sarif_json).expect("parse SARIF");

        assert_eq!(sarif["version"], "2.1.0");
        let run = &sarif["runs"][0];

        let rule = &run["tool"]["driver"]["rules"][0];
        assert_eq!(rule["id"], "SimpleNamespace");
        assert_eq!(rule["shortDescription"]["text"], "Namespace is too complex");
        assert_eq!(rule["defaultConfiguration"]["level"], "warning");
        assert_eq!(rule["properties"]["category"], "Naming");

        let result = &run["results"][0];
        assert_eq!(result["ruleId"], "SimpleNamespace");
        assert_eq!(result["level"], "warning");
        let region = &result["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region["startLine"], 3);
        assert_eq!(region["startColumn"], 18);
        assert_eq!(
            result["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
            "src/Foo.cs"
        );
        assert_eq!(result["fixes"][0]["description"]["text"], "Make namespace simple");
        assert_eq!(run["invocations"][0]["executionSuccessful"], true);
    }

    #[test]
    fn test_sarif_reports_failures() {
        let mut report = test_report();
        report
            .failures
            .push(("simple-namespace".into(), "boom".into()));

        let sarif: serde_json::Value =
            serde_json::from_str(&render(&report).unwrap()).expect("parse SARIF");
        let invocation = &sarif["runs"][0]["invocations"][0];
        assert_eq!(invocation["executionSuccessful"], false);
        assert_eq!(
            invocation["toolExecutionNotifications"][0]["message"]["text"],
            "simple-namespace: boom"
        );
    }
}
