//! Cache path utilities - uses ~/.cache/simple-namespace/<repo-hash>/
//!
//! `SIMPLE_NAMESPACE_CACHE_DIR` replaces the base directory when set.

use std::path::{Path, PathBuf};

/// Environment variable overriding the cache base directory
pub const CACHE_DIR_ENV: &str = "SIMPLE_NAMESPACE_CACHE_DIR";

/// Get the cache directory for a repository.
/// Uses ~/.cache/simple-namespace/<repo-hash>/ on Unix, %LOCALAPPDATA%/simple-namespace/<repo-hash>/ on Windows.
pub fn get_cache_dir(repo_path: &Path) -> PathBuf {
    let repo_hash = hash_path(repo_path);

    if let Some(base) = std::env::var_os(CACHE_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(base).join(&repo_hash);
    }

    let base = dirs::cache_dir().unwrap_or_else(|| {
        // Fallback to ~/.cache
        dirs::home_dir()
            .map(|h| h.join(".cache"))
            .unwrap_or_else(|| PathBuf::from("."))
    });

    base.join("simple-namespace").join(&repo_hash)
}

/// Get the findings cache file path for a repository.
pub fn get_findings_cache_path(repo_path: &Path) -> PathBuf {
    get_cache_dir(repo_path).join("last_findings.json")
}

/// Hash a path to create a unique but deterministic directory name.
/// Uses the canonical path to ensure consistency.
fn hash_path(path: &Path) -> String {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let path_str = canonical.to_string_lossy();
    let digest = format!("{:x}", md5::compute(path_str.as_bytes()));

    // Use canonical path's file_name for consistent naming (important when path is ".")
    let repo_name = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("repo")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(20)
        .collect::<String>();

    format!("{}-{}", repo_name, &digest[..12])
}

/// Ensure the cache directory exists.
pub fn ensure_cache_dir(repo_path: &Path) -> std::io::Result<PathBuf> {
    let cache_dir = get_cache_dir(repo_path);
    std::fs::create_dir_all(&cache_dir)?;
    Ok(cache_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_path_deterministic() {
        let path = Path::new("/tmp/test-repo");
        let hash1 = hash_path(path);
        let hash2 = hash_path(path);
        assert_eq!(hash1, hash2);
        assert!(hash1.starts_with("test-repo-"));
        assert_ne!(hash1, hash_path(Path::new("/tmp/other-repo")));
    }

    #[test]
    fn test_cache_dir_format() {
        let path = Path::new("/home/user/my-project");
        let cache = get_cache_dir(path);
        assert!(cache.to_string_lossy().contains("my-project"));
        assert!(get_findings_cache_path(path).ends_with("last_findings.json"));
    }
}
