use super::*;

#[test]
fn test_normalize_rule_name() {
    assert_eq!(normalize_rule_name("SimpleNamespace"), "simple-namespace");
    assert_eq!(normalize_rule_name("simple_namespace"), "simple-namespace");
    assert_eq!(normalize_rule_name("simple-namespace"), "simple-namespace");
    assert_eq!(normalize_rule_name("IOPath"), "io-path");
}

#[test]
fn test_default_config() {
    let config = ProjectConfig::default();

    assert!(config.is_rule_enabled("SimpleNamespace", true));
    assert!(!config.is_rule_enabled("SomeOptInRule", false));
    assert!(config.severity_override("SimpleNamespace").is_none());
}

#[test]
fn test_parse_toml_config() {
    let toml_content = r#"
[rules.SimpleNamespace]
severity = "error"

[rules.other-rule]
enabled = false

[exclude]
paths = ["Generated/", "**/*.Designer.cs"]

[defaults]
format = "json"
workers = 4
fail_on = "warning"
"#;

    let config: ProjectConfig = toml::from_str(toml_content).expect("parse project config");

    assert!(config.is_rule_enabled("SimpleNamespace", true));
    assert_eq!(
        config.severity_override("SimpleNamespace"),
        Some(Severity::Error)
    );
    assert!(!config.is_rule_enabled("OtherRule", true));

    assert_eq!(config.exclude.paths.len(), 2);

    assert_eq!(config.defaults.format, Some("json".to_string()));
    assert_eq!(config.defaults.workers, Some(4));
    assert_eq!(config.defaults.fail_on, Some("warning".to_string()));
}

#[test]
fn test_rule_lookup_accepts_kebab_case_key() {
    let config: ProjectConfig = toml::from_str(
        r#"
[rules.simple-namespace]
enabled = false
"#,
    )
    .expect("parse project config");

    assert!(!config.is_rule_enabled("SimpleNamespace", true));
}

#[test]
fn test_invalid_severity_is_ignored() {
    let config: ProjectConfig = toml::from_str(
        r#"
[rules.SimpleNamespace]
severity = "critical"
"#,
    )
    .expect("parse project config");

    assert!(config.severity_override("SimpleNamespace").is_none());
}

#[test]
fn test_default_exclude_patterns_applied() {
    let patterns = ExcludeConfig::default().effective_patterns();
    assert_eq!(patterns, vec!["**/bin/**"]);
}

#[test]
fn test_skip_defaults_disables_builtin_patterns() {
    let config = ExcludeConfig {
        paths: vec!["custom/".to_string()],
        skip_defaults: true,
    };
    assert_eq!(config.effective_patterns(), vec!["custom/"]);
}

#[test]
fn test_effective_patterns_deduplication() {
    let config = ExcludeConfig {
        paths: vec!["**/bin/**".to_string()],
        skip_defaults: false,
    };
    let patterns = config.effective_patterns();
    assert_eq!(patterns.iter().filter(|p| *p == "**/bin/**").count(), 1);
}

#[test]
fn test_path_excluder() {
    let config = ProjectConfig {
        exclude: ExcludeConfig {
            paths: vec!["Generated/".to_string(), "**/*.Designer.cs".to_string()],
            skip_defaults: false,
        },
        ..Default::default()
    };
    let excluder = config.path_excluder();

    assert!(excluder.is_excluded(Path::new("bin/Debug/App.cs")));
    assert!(excluder.is_excluded(Path::new("Generated/Model.cs")));
    assert!(excluder.is_excluded(Path::new("src/Forms/Main.Designer.cs")));

    assert!(!excluder.is_excluded(Path::new("src/App/Program.cs")));
    assert!(!excluder.is_excluded(Path::new("src/App/obj/Generated.cs")));
    assert!(!excluder.is_excluded(Path::new("src/Generated/Model.cs")));
}

#[test]
fn test_invalid_pattern_is_skipped() {
    let excluder = PathExcluder::new(&["src/[".to_string(), "**/bin/**".to_string()]);
    assert!(excluder.is_excluded(Path::new("bin/App.cs")));
    assert!(!excluder.is_excluded(Path::new("src/App.cs")));
}

#[test]
fn test_load_missing_and_broken_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_project_config(dir.path());
    assert!(config.rules.is_empty());

    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[rules\nbroken").unwrap();
    let config = load_project_config(dir.path());
    assert!(config.rules.is_empty());

    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[rules.SimpleNamespace]\nenabled = false\n",
    )
    .unwrap();
    let config = load_project_config(dir.path());
    assert!(!config.is_rule_enabled("SimpleNamespace", true));
}
