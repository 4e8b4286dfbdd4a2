//! Fix command implementation
//!
//! Re-reads a cached finding, recomputes its fix against the current file
//! content, prints the diff and optionally writes it.

use anyhow::{Context, Result};
use console::{style, Term};
use std::path::Path;

use crate::fixes::{apply_to_file, generate_rule_fix, FixError, RuleFix};
use crate::models::Finding;

/// Run the fix command
pub fn run(path: &Path, index: usize, apply: bool) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    let Some(findings) = crate::cache::load_findings(&repo_path)? else {
        anyhow::bail!(
            "No findings found. Run `simple-namespace analyze` first.\n\
             Looking for: {}",
            crate::cache::get_findings_cache_path(&repo_path).display()
        );
    };

    if index == 0 || index > findings.len() {
        anyhow::bail!(
            "Invalid finding index: {}. Valid range: 1-{}",
            index,
            findings.len()
        );
    }
    let finding = &findings[index - 1];

    let term = Term::stderr();
    term.write_line(&format!(
        "\n{} Fix for finding #{}\n",
        style("▶").cyan(),
        index
    ))?;
    term.write_line(&format!(
        "  {} {}\n  {} {}\n  {} {}:{}:{}\n",
        style("Rule:").bold(),
        finding.rule_id,
        style("Message:").bold(),
        finding.message,
        style("File:").bold(),
        finding.file.display(),
        finding.line,
        finding.column
    ))?;

    let rule_fix = match generate_rule_fix(finding, &repo_path) {
        Ok(fix) => fix,
        Err(e @ FixError::StaleLocation { .. }) => {
            anyhow::bail!(
                "{}\nThe file changed since the last analysis. Run `simple-namespace analyze` again.",
                e
            )
        }
        Err(e) => return Err(e).context(format!("Failed to compute fix for finding #{}", index)),
    };

    display_rule_fix(&term, &rule_fix)?;

    if apply {
        apply_rule_fix(&term, &repo_path, &rule_fix, finding)?;
    } else if rule_fix.is_applicable() {
        term.write_line(&format!(
            "{} Re-run with --apply to write this change.",
            style("ℹ").blue()
        ))?;
    }

    Ok(())
}

/// Print the fix summary to stderr and the patch to stdout
fn display_rule_fix(term: &Term, rule_fix: &RuleFix) -> Result<()> {
    term.write_line(&format!(
        "{} {}\n",
        style("Fix:").green().bold(),
        rule_fix.title
    ))?;
    term.write_line(&format!(
        "{}\n{}\n",
        style("Description:").bold(),
        rule_fix.description
    ))?;

    if let Some(ref patch) = rule_fix.patch {
        let out = Term::stdout();
        for line in patch.lines() {
            if line.starts_with('+') && !line.starts_with("+++") {
                out.write_line(&format!("{}", style(line).green()))?;
            } else if line.starts_with('-') && !line.starts_with("---") {
                out.write_line(&format!("{}", style(line).red()))?;
            } else if line.starts_with("@@") {
                out.write_line(&format!("{}", style(line).cyan()))?;
            } else {
                out.write_line(line)?;
            }
        }
        term.write_line("")?;
    }

    Ok(())
}

fn apply_rule_fix(term: &Term, repo_path: &Path, rule_fix: &RuleFix, finding: &Finding) -> Result<()> {
    let Some(ref edit) = rule_fix.edit else {
        term.write_line(&format!("{} Nothing to apply.", style("ℹ").blue()))?;
        return Ok(());
    };

    let target = repo_path.join(&rule_fix.file);
    apply_to_file(&target, edit)
        .with_context(|| format!("Failed to apply fix to {}", target.display()))?;

    term.write_line(&format!(
        "{} Applied '{}' to {}",
        style("✓").green(),
        rule_fix.title,
        style(finding.file.display()).cyan()
    ))?;
    term.write_line(&format!(
        "  {}",
        style("Other findings in the cache may now be stale; re-run analyze.").dim()
    ))?;
    Ok(())
}
