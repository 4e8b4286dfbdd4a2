//! Detector execution engine with parallel support
//!
//! The DetectorEngine orchestrates the execution of all registered detectors:
//! - Skips detectors whose rule is disabled by project config
//! - Runs detectors in parallel using rayon
//! - Applies severity overrides and assigns stable finding ids
//! - Collects, sorts and caps findings
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    DetectorEngine                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Register detectors                                  │
//! │  2. Drop detectors disabled by config                   │
//! │  3. Run in parallel (rayon), catching panics            │
//! │  4. Override severities, assign ids                     │
//! │  5. Sort, cap and return findings                       │
//! └─────────────────────────────────────────────────────────┘
//! ```

use crate::config::ProjectConfig;
use crate::detectors::base::{DetectionSummary, Detector, DetectorResult};
use crate::detectors::file_provider::FileProvider;
use crate::models::{deterministic_finding_id, Finding};
use anyhow::Result;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Maximum findings to keep to prevent memory exhaustion
const MAX_FINDINGS_LIMIT: usize = 10_000;

/// Everything one engine run produced
#[derive(Debug, Clone, Default)]
pub struct EngineRun {
    /// Sorted, capped findings of all successful detectors
    pub findings: Vec<Finding>,
    /// `(detector, error)` for every detector that failed
    pub failures: Vec<(String, String)>,
    pub summary: DetectionSummary,
}

/// Orchestrates rule detection across all registered detectors
pub struct DetectorEngine {
    /// Registered detectors
    detectors: Vec<Arc<dyn Detector>>,
    /// Number of worker threads for parallel execution
    workers: usize,
    /// Maximum findings to return
    max_findings: usize,
    /// Rule enable/severity overrides
    config: ProjectConfig,
}

impl DetectorEngine {
    /// Create a new detector engine
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        let actual_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16) // Cap at 16 threads
        } else {
            workers
        };

        Self {
            detectors: Vec::new(),
            workers: actual_workers,
            max_findings: MAX_FINDINGS_LIMIT,
            config: ProjectConfig::default(),
        }
    }

    /// Set the maximum number of findings to return
    pub fn with_max_findings(mut self, max: usize) -> Self {
        self.max_findings = max;
        self
    }

    /// Use rule overrides from a project config
    pub fn with_config(mut self, config: ProjectConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a detector
    pub fn register(&mut self, detector: Arc<dyn Detector>) {
        debug!("Registering detector: {}", detector.name());
        self.detectors.push(detector);
    }

    /// Register multiple detectors at once
    pub fn register_all(&mut self, detectors: impl IntoIterator<Item = Arc<dyn Detector>>) {
        for detector in detectors {
            self.register(detector);
        }
    }

    /// Get the number of registered detectors
    pub fn detector_count(&self) -> usize {
        self.detectors.len()
    }

    /// Get names of all registered detectors
    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Detectors whose rule is enabled after config overrides
    fn enabled_detectors(&self) -> Vec<Arc<dyn Detector>> {
        self.detectors
            .iter()
            .filter(|d| {
                let rule = d.rule();
                let enabled = self.config.is_rule_enabled(rule.id, rule.enabled_by_default);
                if !enabled {
                    info!("Rule {} disabled, skipping {}", rule.id, d.name());
                }
                enabled
            })
            .cloned()
            .collect()
    }

    /// Run all enabled detectors and collect findings
    ///
    /// Findings come back sorted by file, line and column.
    pub fn run(&self, files: &dyn FileProvider) -> Result<EngineRun> {
        let start = Instant::now();
        let detectors = self.enabled_detectors();
        info!(
            "Starting detection with {} detectors on {} workers over {} files",
            detectors.len(),
            self.workers,
            files.files().len()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        let results: Vec<DetectorResult> = pool.install(|| {
            detectors
                .par_iter()
                .map(|detector| self.run_single_detector(detector, files))
                .collect()
        });

        let mut run = EngineRun::default();
        for result in results {
            run.summary.add_result(&result);
            if result.success {
                run.findings.extend(result.findings);
            } else if let Some(err) = result.error {
                error!("Detector {} failed: {}", result.detector_name, err);
                run.failures.push((result.detector_name, err));
            }
        }

        for finding in &mut run.findings {
            if let Some(severity) = self.config.severity_override(&finding.rule_id) {
                finding.severity = severity;
            }
            finding.id = deterministic_finding_id(
                &finding.rule_id,
                &finding.file.to_string_lossy(),
                finding.line,
                &finding.message,
            );
        }

        run.findings.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        // Limit findings to prevent memory exhaustion
        if run.findings.len() > self.max_findings {
            warn!(
                "Truncating findings from {} to {} (max limit)",
                run.findings.len(),
                self.max_findings
            );
            run.findings.truncate(self.max_findings);
        }

        run.summary.total_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Detection complete: {} findings from {}/{} detectors in {:?}",
            run.findings.len(),
            run.summary.detectors_succeeded,
            run.summary.detectors_run,
            start.elapsed()
        );

        Ok(run)
    }

    /// Run a single detector with error handling and timing
    fn run_single_detector(
        &self,
        detector: &Arc<dyn Detector>,
        files: &dyn FileProvider,
    ) -> DetectorResult {
        let name = detector.name().to_string();
        let start = Instant::now();

        debug!("Running detector: {}", name);

        // Wrap in catch_unwind to handle panics
        let detect_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            detector.detect(files)
        }));

        let duration = start.elapsed().as_millis() as u64;
        match detect_result {
            Ok(Ok(findings)) => {
                debug!(
                    "Detector {} found {} findings in {}ms",
                    name,
                    findings.len(),
                    duration
                );
                DetectorResult::success(name, findings, duration)
            }
            Ok(Err(e)) => DetectorResult::failure(name, format!("{:#}", e), duration),
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!("Detector {} panicked: {}", name, panic_msg);
                DetectorResult::failure(name, format!("Panic: {}", panic_msg), duration)
            }
        }
    }
}

impl Default for DetectorEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Builder for DetectorEngine with fluent API
pub struct DetectorEngineBuilder {
    workers: usize,
    max_findings: usize,
    detectors: Vec<Arc<dyn Detector>>,
    config: ProjectConfig,
}

impl DetectorEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            workers: 0,
            max_findings: MAX_FINDINGS_LIMIT,
            detectors: Vec::new(),
            config: ProjectConfig::default(),
        }
    }

    /// Set number of worker threads
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set maximum findings
    pub fn max_findings(mut self, max: usize) -> Self {
        self.max_findings = max;
        self
    }

    /// Add a detector
    pub fn detector(mut self, detector: Arc<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Add multiple detectors
    pub fn detectors(mut self, detectors: impl IntoIterator<Item = Arc<dyn Detector>>) -> Self {
        self.detectors.extend(detectors);
        self
    }

    /// Apply rule overrides from project config
    pub fn config(mut self, config: ProjectConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine
    pub fn build(self) -> DetectorEngine {
        let mut engine = DetectorEngine::new(self.workers)
            .with_max_findings(self.max_findings)
            .with_config(self.config);

        engine.register_all(self.detectors);
        engine
    }
}

impl Default for DetectorEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
