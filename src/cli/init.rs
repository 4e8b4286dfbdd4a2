//! Init command - write an example simple-namespace.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::CONFIG_FILE_NAME;

const DEFAULT_CONFIG: &str = r#"# simple-namespace configuration

# Per-rule overrides. Rule ids may also be written in kebab-case
# ([rules.simple-namespace]).
[rules.SimpleNamespace]
enabled = true
# info, warning or error
severity = "warning"

[exclude]
# Glob patterns relative to the repository root. A trailing "/" excludes a
# whole directory.
paths = [
    # "Generated/",
    # "**/*.Designer.cs",
]
# Set to true to also analyze **/bin/**
skip_defaults = false

[defaults]
# Output format when --format is not given (text, json, sarif)
format = "text"
# Worker threads (omit for one per core)
# workers = 4
# Exit with code 1 when a finding at or above this severity exists
# fail_on = "warning"
"#;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config_path = repo_path.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists; remove it first to regenerate",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    Ok(())
}
