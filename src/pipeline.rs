//! The end-to-end run: ensure harness, run benchmarks, extract estimates,
//! write the report, check for the dashboard page.
//!
//! Stages run strictly in order. The first fatal error stops the run, so a
//! failed extraction leaves any previous report in place.

use std::path::{Path, PathBuf};

use crate::dashboard::{self, PresenceStatus, DASHBOARD_FILE};
use crate::ensure::{DependencyEnsurer, EnsureOutcome};
use crate::error::{Result, Stage};
use crate::extract;
use crate::harness::{HarnessInvoker, RunConfig};
use crate::report::{self, REPORT_FILE};
use crate::runner::CommandRunner;
use crate::schema::Report;

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub run: RunConfig,
    pub project_root: PathBuf,
    /// Where the harness leaves its estimates.
    pub criterion_dir: PathBuf,
    /// Where `benchmarks.json` and the dashboard page live.
    pub out_dir: PathBuf,
}

impl PipelineConfig {
    /// Standard layout: `target/criterion` in, `docs/benches` out.
    pub fn new(project_root: impl Into<PathBuf>, run: RunConfig) -> Self {
        let project_root = project_root.into();
        Self {
            criterion_dir: project_root.join("target").join("criterion"),
            out_dir: project_root.join("docs").join("benches"),
            run,
            project_root,
        }
    }

    pub fn with_criterion_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.criterion_dir = dir.into();
        self
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn report_path(&self) -> PathBuf {
        self.out_dir.join(REPORT_FILE)
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.out_dir.join(DASHBOARD_FILE)
    }
}

#[derive(Clone, Debug)]
pub struct PipelineOutcome {
    pub ensure: EnsureOutcome,
    pub report_path: PathBuf,
    pub report: Report,
    pub dashboard: PresenceStatus,
}

pub struct Pipeline<R> {
    config: PipelineConfig,
    runner: R,
}

impl<R: CommandRunner> Pipeline<R> {
    pub fn new(config: PipelineConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self) -> Result<PipelineOutcome> {
        let cfg = &self.config;

        enter(Stage::EnsureDependency);
        let ensure = DependencyEnsurer::new(&self.runner).ensure()?;

        enter(Stage::RunHarness);
        HarnessInvoker::new(&self.runner).run(&cfg.run, &cfg.project_root)?;

        enter(Stage::ExtractResults);
        let report = Report::from(extract::extract(&cfg.criterion_dir)?);

        enter(Stage::WriteReport);
        let report_path = cfg.report_path();
        report::write_report(&report.results, &report_path)?;
        log_summary(&report);

        enter(Stage::CheckDashboard);
        let dashboard = dashboard::check(&cfg.out_dir);

        Ok(PipelineOutcome {
            ensure,
            report_path,
            report,
            dashboard,
        })
    }
}

fn enter(stage: Stage) {
    tracing::debug!(%stage, "entering stage");
}

fn log_summary(report: &Report) {
    for r in &report.results {
        tracing::info!(
            "{:<24} {:>14.1} ns  [{:.1}, {:.1}]",
            r.benchmark,
            r.mean_ns,
            r.ci_lower,
            r.ci_upper
        );
    }
    if let (Some(fast), Some(slow)) = (report.fastest(), report.slowest()) {
        tracing::info!(
            fastest = %fast.benchmark,
            slowest = %slow.benchmark,
            "{} benchmarks",
            report.results.len()
        );
    }
}

/// Resolve a possibly relative path against the project root.
pub fn under_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
