//! Text (terminal) reporter with colors and formatting
//!
//! Colors follow `console`'s detection, so piped or redirected output is
//! plain text.

use crate::models::{AnalysisReport, Finding, Severity};
use anyhow::Result;
use console::style;

/// Severity label, colored
fn severity_label(severity: Severity) -> String {
    let label = severity.to_string();
    match severity {
        Severity::Error => style(label).red().bold().to_string(),
        Severity::Warning => style(label).yellow().bold().to_string(),
        Severity::Info => style(label).blue().to_string(),
    }
}

/// `path:line:col: warning[RuleId]: message`
fn format_finding(finding: &Finding) -> String {
    format!(
        "{}:{}:{}: {}[{}]: {}",
        finding.file.display(),
        finding.line,
        finding.column,
        severity_label(finding.severity),
        finding.rule_id,
        finding.message
    )
}

/// Render report as formatted terminal output
pub fn render(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{}\n", style("simple-namespace analysis").bold()));
    out.push_str(&format!(
        "{}\n",
        style("──────────────────────────────────────").dim()
    ));
    out.push_str(&format!(
        "Root: {}  Files: {}\n\n",
        report.root.display(),
        report.files_analyzed
    ));

    // Findings summary
    let fs = &report.findings_summary;
    out.push_str(&format!("{} ({} total)\n", style("FINDINGS").bold(), fs.total));

    let mut summary_parts = Vec::new();
    if fs.error > 0 {
        summary_parts.push(style(format!("{} error", fs.error)).red().to_string());
    }
    if fs.warning > 0 {
        summary_parts.push(style(format!("{} warning", fs.warning)).yellow().to_string());
    }
    if fs.info > 0 {
        summary_parts.push(style(format!("{} info", fs.info)).blue().to_string());
    }
    if !summary_parts.is_empty() {
        out.push_str(&format!("  {}\n", summary_parts.join(" | ")));
    }
    out.push('\n');

    for (i, finding) in report.findings.iter().enumerate() {
        out.push_str(&format!(
            "{} {}\n",
            style(format!("{:>3}.", i + 1)).dim(),
            format_finding(finding)
        ));
    }

    if !report.failures.is_empty() {
        out.push('\n');
        out.push_str(&format!("{}\n", style("FAILED DETECTORS").red().bold()));
        for (name, error) in &report.failures {
            out.push_str(&format!("  {}: {}\n", name, error));
        }
    }

    if report.findings.is_empty() {
        out.push_str(&format!("{}\n", style("No namespace issues found.").green()));
    } else if report.findings.iter().any(|f| f.fix_title.is_some()) {
        out.push('\n');
        out.push_str(&format!(
            "{}\n",
            style("Run `simple-namespace fix <N>` to preview the fix for finding N.").dim()
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_text_render_lists_findings() {
        console::set_colors_enabled(false);
        let out = render(&test_report()).expect("render text");

        assert!(out.contains("Files: 4"));
        assert!(out.contains("1 warning"));
        assert!(out.contains(
            "  1. src/Foo.cs:3:18: warning[SimpleNamespace]: \
             Namespace 'ConsoleApp.Sub' is too complex for the public type 'Foo'"
        ));
        assert!(out.contains("simple-namespace fix <N>"));
    }

    #[test]
    fn test_text_render_clean_report() {
        console::set_colors_enabled(false);
        let mut report = test_report();
        report.findings.clear();
        report.findings_summary = Default::default();

        let out = render(&report).expect("render text");
        assert!(out.contains("(0 total)"));
        assert!(out.contains("No namespace issues found."));
    }

    #[test]
    fn test_text_render_failures() {
        console::set_colors_enabled(false);
        let mut report = test_report();
        report
            .failures
            .push(("simple-namespace".into(), "unknown type symbol #3".into()));

        let out = render(&report).expect("render text");
        assert!(out.contains("FAILED DETECTORS"));
        assert!(out.contains("simple-namespace: unknown type symbol #3"));
    }
}
