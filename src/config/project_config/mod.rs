//! Project-level configuration support
//!
//! Loads per-project configuration from `simple-namespace.toml` in the
//! repository root.
//!
//! # Configuration Format
//!
//! ```toml
//! # simple-namespace.toml
//!
//! [rules.SimpleNamespace]
//! enabled = true
//! severity = "error"  # Override default severity
//!
//! [exclude]
//! paths = ["Generated/", "**/*.Designer.cs"]
//!
//! [defaults]
//! format = "text"
//! workers = 8
//! fail_on = "warning"
//! ```

use crate::models::Severity;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the project config file at the repository root
pub const CONFIG_FILE_NAME: &str = "simple-namespace.toml";

/// Built-in default exclusion patterns for build output.
/// These are applied automatically unless `skip_defaults = true` in config.
/// Generated sources under `obj/` are still analyzed.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["**/bin/**"];

/// Project configuration loaded from `simple-namespace.toml`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Per-rule overrides, keyed by rule id
    #[serde(default)]
    pub rules: HashMap<String, RuleConfigOverride>,

    /// Path exclusion
    #[serde(default)]
    pub exclude: ExcludeConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Configuration override for a specific rule
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RuleConfigOverride {
    /// Whether the rule is enabled (default: the rule's own default)
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Override the default severity (info, warning, error)
    #[serde(default)]
    pub severity: Option<String>,
}

/// Path exclusion configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExcludeConfig {
    /// Paths/patterns to exclude from analysis
    #[serde(default)]
    pub paths: Vec<String>,

    /// If true, disable built-in default exclusion patterns
    #[serde(default)]
    pub skip_defaults: bool,
}

impl ExcludeConfig {
    /// Returns effective exclusion patterns (defaults + user patterns).
    /// If `skip_defaults` is true, only user patterns are returned.
    pub fn effective_patterns(&self) -> Vec<String> {
        let mut patterns = Vec::new();

        if !self.skip_defaults {
            patterns.extend(DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()));
        }

        for p in &self.paths {
            if !patterns.contains(p) {
                patterns.push(p.clone());
            }
        }

        patterns
    }
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json, sarif)
    #[serde(default)]
    pub format: Option<String>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,

    /// Fail-on severity threshold for CI
    #[serde(default)]
    pub fail_on: Option<String>,
}

/// Compiled exclusion patterns, matched against repository-relative paths
#[derive(Debug, Clone)]
pub struct PathExcluder {
    set: GlobSet,
}

impl PathExcluder {
    /// Compile `patterns`. Invalid patterns are logged and skipped.
    ///
    /// A pattern ending in `/` is a directory prefix (`Generated/` excludes
    /// everything below `Generated`).
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let expanded = if pattern.ends_with('/') {
                format!("{pattern}**")
            } else {
                pattern.clone()
            };
            match Glob::new(&expanded) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => warn!("Ignoring invalid exclude pattern '{}': {}", pattern, e),
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build exclude patterns: {}", e);
            GlobSet::empty()
        });
        Self { set }
    }

    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.set.is_match(relative_path)
    }
}

/// Load project configuration from the repository root.
///
/// Returns default configuration if no config file is found or the file
/// cannot be parsed.
pub fn load_project_config(repo_path: &Path) -> ProjectConfig {
    let toml_path = repo_path.join(CONFIG_FILE_NAME);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

impl ProjectConfig {
    fn rule_override(&self, id: &str) -> Option<&RuleConfigOverride> {
        self.rules.get(id).or_else(|| {
            let normalized = normalize_rule_name(id);
            self.rules
                .iter()
                .find(|(key, _)| normalize_rule_name(key) == normalized)
                .map(|(_, config)| config)
        })
    }

    /// Whether a rule is enabled, falling back to `enabled_by_default`
    pub fn is_rule_enabled(&self, id: &str, enabled_by_default: bool) -> bool {
        self.rule_override(id)
            .and_then(|c| c.enabled)
            .unwrap_or(enabled_by_default)
    }

    /// Severity override for a rule (if any)
    ///
    /// Unparseable values are logged and ignored.
    pub fn severity_override(&self, id: &str) -> Option<Severity> {
        let raw = self.rule_override(id)?.severity.as_deref()?;
        match raw.parse() {
            Ok(severity) => Some(severity),
            Err(e) => {
                warn!("Ignoring severity override for {}: {}", id, e);
                None
            }
        }
    }

    /// Compile the effective exclusion patterns
    pub fn path_excluder(&self) -> PathExcluder {
        PathExcluder::new(&self.exclude.effective_patterns())
    }
}

/// Normalize rule name for config lookup
/// Converts various formats to kebab-case for matching
pub fn normalize_rule_name(name: &str) -> String {
    // SimpleNamespace -> simple-namespace
    // simple_namespace -> simple-namespace
    // simple-namespace -> simple-namespace

    let mut result = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_is_lower = i > 0 && chars[i - 1].is_lowercase();
            let is_acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && i + 1 < chars.len()
                && chars[i + 1].is_lowercase();

            if prev_is_lower || is_acronym_end {
                result.push('-');
            }
            result.extend(c.to_lowercase());
        } else if *c == '_' {
            result.push('-');
        } else {
            result.push(*c);
        }
    }

    result
}

#[cfg(test)]
mod tests;
