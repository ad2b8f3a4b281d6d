use crate::error::{PipelineError, Result};
use crate::runner::{CommandRunner, CommandSpec};

/// Cargo subcommand that provides the benchmark harness.
pub const HARNESS_SUBCOMMAND: &str = "criterion";

/// Crate installed when the harness is missing.
pub const HARNESS_CRATE: &str = "cargo-criterion";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnsureOutcome {
    AlreadyInstalled,
    Installed,
}

pub fn probe_command() -> CommandSpec {
    CommandSpec::new("cargo")
        .args([HARNESS_SUBCOMMAND, "--version"])
        .captured()
}

pub fn install_command() -> CommandSpec {
    CommandSpec::new("cargo").args(["install", "--force", HARNESS_CRATE])
}

/// Makes sure `cargo criterion` is runnable, installing it if the probe fails.
pub struct DependencyEnsurer<R> {
    runner: R,
}

impl<R: CommandRunner> DependencyEnsurer<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn is_installed(&self) -> bool {
        match self.runner.run(&probe_command()) {
            Ok(out) if out.is_success() => {
                tracing::debug!(version = %out.stdout.trim(), "harness probe succeeded");
                true
            }
            Ok(out) => {
                tracing::debug!(status = %out.describe_status(), "harness probe failed");
                false
            }
            Err(err) => {
                tracing::debug!(error = %err, "harness probe could not start");
                false
            }
        }
    }

    pub fn ensure(&self) -> Result<EnsureOutcome> {
        if self.is_installed() {
            tracing::info!("{HARNESS_CRATE} is already installed");
            return Ok(EnsureOutcome::AlreadyInstalled);
        }

        tracing::info!("installing {HARNESS_CRATE}");
        let out = self
            .runner
            .run(&install_command())
            .map_err(|err| PipelineError::DependencyInstall {
                tool: HARNESS_CRATE.to_string(),
                reason: err.to_string(),
            })?;

        if !out.is_success() {
            return Err(PipelineError::DependencyInstall {
                tool: HARNESS_CRATE.to_string(),
                reason: format!(
                    "`{}` returned {}",
                    install_command().display(),
                    out.describe_status()
                ),
            });
        }

        tracing::info!("installed {HARNESS_CRATE}");
        Ok(EnsureOutcome::Installed)
    }
}
