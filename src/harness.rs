use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::ensure::HARNESS_SUBCOMMAND;
use crate::runner::{CommandRunner, CommandSpec};
use crate::BenchGroup;

/// Package whose bench targets are driven by default.
pub const DEFAULT_PACKAGE: &str = "petravm-prover";

/// Compiler flags handed to the engine build so timings reflect the host CPU.
pub const NATIVE_RUSTFLAGS: (&str, &str) = ("RUSTFLAGS", "-C target-cpu=native");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub group: BenchGroup,
    pub package: String,
    pub features: BTreeSet<String>,
    pub env_overrides: BTreeMap<String, String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(BenchGroup::default())
    }
}

impl RunConfig {
    pub fn new(group: BenchGroup) -> Self {
        let mut env_overrides = BTreeMap::new();
        env_overrides.insert(NATIVE_RUSTFLAGS.0.to_string(), NATIVE_RUSTFLAGS.1.to_string());
        Self {
            group,
            package: DEFAULT_PACKAGE.to_string(),
            features: BTreeSet::new(),
            env_overrides,
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Accepts a cargo-style feature list: names separated by commas or
    /// whitespace. Empty entries are dropped.
    pub fn with_features(mut self, list: &str) -> Self {
        self.features.extend(
            list.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|f| !f.is_empty())
                .map(str::to_string),
        );
        self
    }

    /// Comma-joined `--features` value, or `None` when no toggles are set.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            return None;
        }
        Some(self.features.iter().cloned().collect::<Vec<_>>().join(","))
    }
}

/// Command that runs the configured group's bench target.
pub fn harness_command(config: &RunConfig, project_root: &Path) -> CommandSpec {
    let mut spec = CommandSpec::new("cargo")
        .args([HARNESS_SUBCOMMAND, "--package"])
        .arg(config.package.as_str())
        .args(["--bench", config.group.bench_target()]);
    if let Some(features) = config.features_arg() {
        spec = spec.args(["--features".to_string(), features]);
    }
    spec.cwd(project_root).envs(&config.env_overrides)
}

pub struct HarnessInvoker<R> {
    runner: R,
}

impl<R: CommandRunner> HarnessInvoker<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Blocks until the harness exits. Its estimates land under the
    /// project's `target/criterion` tree.
    pub fn run(&self, config: &RunConfig, project_root: &Path) -> Result<()> {
        let spec = harness_command(config, project_root);
        tracing::info!(
            group = %config.group,
            command = %spec.display(),
            "running benchmarks"
        );

        let out = self
            .runner
            .run(&spec)
            .map_err(|err| PipelineError::HarnessExecution {
                group: config.group.to_string(),
                reason: format!("could not start `{}`: {err}", spec.display()),
            })?;

        if !out.is_success() {
            return Err(PipelineError::HarnessExecution {
                group: config.group.to_string(),
                reason: out.describe_status(),
            });
        }
        Ok(())
    }
}
