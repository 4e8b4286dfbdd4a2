//! Rules command - describe every rule and its fix

use anyhow::Result;
use console::style;
use std::path::Path;

use crate::config::{load_project_config, ProjectConfig};
use crate::detectors::{all_rules, RuleDescriptor};
use crate::fixes::fix_for_rule;

/// Run the rules command
pub fn run(path: &Path) -> Result<()> {
    let config = load_project_config(path);
    for rule in all_rules() {
        print!("{}", describe_rule(rule, &config));
    }
    Ok(())
}

/// Rule metadata with the project's overrides applied
fn describe_rule(rule: &RuleDescriptor, config: &ProjectConfig) -> String {
    let severity = config
        .severity_override(rule.id)
        .unwrap_or(rule.default_severity);
    let enabled = config.is_rule_enabled(rule.id, rule.enabled_by_default);

    let mut out = format!("{}\n", style(rule.id).bold());
    out.push_str(&format!("  Title:          {}\n", rule.title));
    out.push_str(&format!("  Category:       {}\n", rule.category));
    out.push_str(&format!("  Severity:       {}\n", severity));
    out.push_str(&format!("  Enabled:        {}\n", enabled));
    out.push_str(&format!("  Message:        {}\n", rule.message_format));
    match fix_for_rule(rule.id) {
        Some(fix) => {
            out.push_str(&format!("  Fix:            {}\n", fix.title));
            out.push_str(&format!(
                "  Fix all:        {}\n",
                if fix.supports_fix_all() { "supported" } else { "not supported" }
            ));
        }
        None => out.push_str("  Fix:            none\n"),
    }
    out.push_str(&format!("  {}\n", style(rule.description).dim()));
    out
}
