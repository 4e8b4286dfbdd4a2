//! Analyze command
//!
//! Walks the repository for C# sources, runs the detector engine, prints the
//! report and caches the findings for `fix`.

use crate::cache;
use crate::config::{load_project_config, PathExcluder, ProjectConfig};
use crate::detectors::{default_detectors, DetectorEngineBuilder, SourceFiles};
use crate::models::{AnalysisReport, Severity};
use crate::parsers::is_supported_file;
use crate::reporters::{self, OutputFormat};

use anyhow::{Context, Result};
use console::style;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tracing::{info, warn};

/// Effective settings after merging CLI flags over project defaults
#[derive(Debug, Clone, PartialEq)]
struct AnalyzeSettings {
    format: OutputFormat,
    fail_on: Option<Severity>,
    workers: usize,
}

impl AnalyzeSettings {
    fn resolve(
        config: &ProjectConfig,
        format: Option<String>,
        fail_on: Option<String>,
        workers: Option<usize>,
    ) -> Result<Self> {
        let format = match format.or_else(|| config.defaults.format.clone()) {
            Some(f) => OutputFormat::from_str(&f)?,
            None => OutputFormat::default(),
        };
        let fail_on = fail_on
            .or_else(|| config.defaults.fail_on.clone())
            .map(|s| Severity::from_str(&s))
            .transpose()
            .context("Invalid fail_on value")?;
        let workers = workers.or(config.defaults.workers).unwrap_or(0);

        Ok(Self {
            format,
            fail_on,
            workers,
        })
    }
}

/// Run the analyze command
pub fn run(
    path: &Path,
    format: Option<String>,
    output: Option<&Path>,
    fail_on: Option<String>,
    workers: Option<usize>,
) -> Result<()> {
    let start = Instant::now();
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config = load_project_config(&repo_path);
    let settings = AnalyzeSettings::resolve(&config, format, fail_on, workers)?;

    let files = collect_source_files(&repo_path, &config.path_excluder());
    info!("Found {} C# files in {}", files.len(), repo_path.display());
    let files_analyzed = files.len();

    let engine = DetectorEngineBuilder::new()
        .workers(settings.workers)
        .config(config)
        .detectors(default_detectors())
        .build();
    let run = engine.run(&SourceFiles::new(files, repo_path.clone()))?;

    let mut report = AnalysisReport::new(repo_path.clone(), files_analyzed, run.findings);
    report.failures = run.failures;

    if let Err(e) = cache::save_findings(&repo_path, &report.findings) {
        warn!("Failed to cache findings: {:#}", e);
    }

    // Colors only make sense on a terminal
    if output.is_some() {
        console::set_colors_enabled(false);
    }
    let rendered = reporters::report_with_format(&report, settings.format)?;
    match output {
        Some(out_path) => {
            std::fs::write(out_path, &rendered)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(out_path.display()).cyan()
            );
        }
        None => print!("{}", rendered),
    }

    info!(
        "Analysis finished in {:.2}s: {} findings",
        start.elapsed().as_secs_f64(),
        report.findings.len()
    );

    check_exit_status(&report, settings.fail_on)
}

/// Collect C# sources, respecting .gitignore and the configured excludes
fn collect_source_files(repo_path: &Path, excluder: &PathExcluder) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(repo_path);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(".simple-namespace-ignore");

    let mut files: Vec<PathBuf> = builder
        .build()
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_supported_file(path))
        .filter(|path| {
            let relative = path.strip_prefix(repo_path).unwrap_or(path.as_path());
            !excluder.is_excluded(relative)
        })
        .collect();

    files.sort();
    files
}

/// Exit with code 1 on detector failures or when `fail_on` is met
fn check_exit_status(report: &AnalysisReport, fail_on: Option<Severity>) -> Result<()> {
    if !report.failures.is_empty() {
        eprintln!(
            "{} {} detector(s) failed",
            style("✗").red(),
            report.failures.len()
        );
        std::process::exit(1);
    }
    if let Some(threshold) = fail_on {
        if report.has_findings_at_or_above(threshold) {
            eprintln!("Failing due to --fail-on={} threshold", threshold);
            std::process::exit(1);
        }
    }
    Ok(())
}
