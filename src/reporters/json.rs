//! JSON reporter
//!
//! Outputs the full AnalysisReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::models::AnalysisReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["files_analyzed"], 4);
        assert_eq!(parsed["findings_summary"]["warning"], 1);
        let finding = &parsed["findings"][0];
        assert_eq!(finding["rule_id"], "SimpleNamespace");
        assert_eq!(finding["severity"], "warning");
        assert_eq!(finding["arguments"][1], "Foo");
    }

    #[test]
    fn test_json_report_roundtrips() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let back: AnalysisReport = serde_json::from_str(&json_str).expect("parse report");
        assert_eq!(back.findings, report.findings);
    }

    #[test]
    fn test_json_empty_findings() {
        let mut report = test_report();
        report.findings.clear();
        report.findings_summary = Default::default();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["findings"].as_array().expect("findings array").len(), 0);
    }
}
