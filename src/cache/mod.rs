//! Findings cache
//!
//! `analyze` stores the findings of its last run so that `fix <N>` can
//! address them by position without re-running the analysis.

pub mod paths;

pub use paths::{ensure_cache_dir, get_cache_dir, get_findings_cache_path, CACHE_DIR_ENV};

use crate::models::Finding;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk shape of `last_findings.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingsCache {
    pub root: PathBuf,
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
    pub findings: Vec<Finding>,
}

/// Store the findings of a run, replacing the previous cache
pub fn save_findings(repo_path: &Path, findings: &[Finding]) -> Result<PathBuf> {
    let cache_dir = ensure_cache_dir(repo_path)
        .with_context(|| format!("Failed to create cache dir for {}", repo_path.display()))?;
    let cache_path = cache_dir.join("last_findings.json");

    let cache = FindingsCache {
        root: repo_path.to_path_buf(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        findings: findings.to_vec(),
    };
    std::fs::write(&cache_path, serde_json::to_string_pretty(&cache)?)
        .with_context(|| format!("Failed to write {}", cache_path.display()))?;

    debug!("Cached {} findings at {}", findings.len(), cache_path.display());
    Ok(cache_path)
}

/// Load the findings of the last run, or `None` if there is no cache
pub fn load_findings(repo_path: &Path) -> Result<Option<Vec<Finding>>> {
    let cache_path = get_findings_cache_path(repo_path);
    if !cache_path.exists() {
        return Ok(None);
    }

    let data = std::fs::read_to_string(&cache_path)
        .with_context(|| format!("Failed to read {}", cache_path.display()))?;
    let cache: FindingsCache = serde_json::from_str(&data)
        .with_context(|| format!("Corrupt findings cache {}", cache_path.display()))?;
    Ok(Some(cache.findings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn test_save_and_load_findings() {
        let cache = tempfile::tempdir().unwrap();
        let repo = tempfile::tempdir().unwrap();
        std::env::set_var(CACHE_DIR_ENV, cache.path());

        assert!(load_findings(repo.path()).unwrap().is_none());

        let findings = vec![Finding {
            rule_id: "SimpleNamespace".into(),
            severity: Severity::Warning,
            file: PathBuf::from("Foo.cs"),
            line: 1,
            arguments: vec!["A.B".into(), "Foo".into()],
            ..Default::default()
        }];
        let path = save_findings(repo.path(), &findings).unwrap();
        assert!(path.starts_with(cache.path()));

        let loaded = load_findings(repo.path()).unwrap().expect("cached findings");
        assert_eq!(loaded, findings);

        std::fs::write(&path, "not json").unwrap();
        assert!(load_findings(repo.path()).is_err());
    }
}
