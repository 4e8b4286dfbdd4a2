//! Configuration module for simple-namespace
//!
//! This module handles:
//! - Project-level configuration (simple-namespace.toml)
//! - Rule enable/severity overrides
//! - Path exclusion
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_project_config, normalize_rule_name, CliDefaults, ExcludeConfig, PathExcluder,
    ProjectConfig, RuleConfigOverride, CONFIG_FILE_NAME, DEFAULT_EXCLUDE_PATTERNS,
};
