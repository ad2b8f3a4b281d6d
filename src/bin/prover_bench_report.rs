use clap::Parser;
use prover_bench_report::dashboard::PresenceStatus;
use prover_bench_report::harness::{RunConfig, DEFAULT_PACKAGE};
use prover_bench_report::pipeline::under_root;
use prover_bench_report::runner::SystemRunner;
use prover_bench_report::{BenchGroup, Pipeline, PipelineConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "prover-bench-report")]
#[command(about = "Run the prover benchmarks and write docs/benches/benchmarks.json")]
struct Args {
    /// Cargo features to enable for the benchmarked package (comma separated).
    #[arg(long, value_name = "LIST")]
    features: Option<String>,

    /// Benchmark trace generation instead of proving.
    #[arg(long, default_value_t = false)]
    generation: bool,

    /// Workspace root the harness runs in.
    #[arg(long, value_name = "DIR", default_value = ".")]
    project_root: PathBuf,

    /// Package whose bench targets are run.
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    package: String,

    /// Report directory. Relative paths resolve against the project root.
    #[arg(long, value_name = "DIR", default_value = "docs/benches")]
    out_dir: PathBuf,

    /// Harness output tree. Relative paths resolve against the project root.
    #[arg(long, value_name = "DIR", default_value = "target/criterion")]
    criterion_dir: PathBuf,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut run = RunConfig::new(BenchGroup::from_generation_flag(self.generation))
            .with_package(self.package.as_str());
        if let Some(list) = &self.features {
            run = run.with_features(list);
        }

        let root = &self.project_root;
        PipelineConfig::new(root.clone(), run)
            .with_criterion_dir(under_root(root, &self.criterion_dir))
            .with_out_dir(under_root(root, &self.out_dir))
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.pipeline_config();
    tracing::info!(
        group = %config.run.group,
        root = %config.project_root.display(),
        "starting benchmark report"
    );

    let pipeline = Pipeline::new(config, SystemRunner);
    match pipeline.run() {
        Ok(outcome) => {
            if outcome.dashboard == PresenceStatus::Missing {
                tracing::warn!(
                    expected = %pipeline.config().dashboard_path().display(),
                    "report written without a dashboard page"
                );
            }
            tracing::info!(
                path = %outcome.report_path.display(),
                "done; commit the benches directory to publish it"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(stage = %err.stage(), "{err}");
            ExitCode::FAILURE
        }
    }
}
