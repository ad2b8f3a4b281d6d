pub mod dashboard;
pub mod ensure;
pub mod error;
pub mod extract;
pub mod fixture;
pub mod harness;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod schema;

pub use error::{PipelineError, Stage};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutcome};
pub use schema::{BenchmarkResult, Report};

/// Benchmark group driven through the harness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BenchGroup {
    /// Prove traces for every benchmarked opcode.
    #[default]
    Proving,
    /// Generate traces only, without proving them.
    Generation,
}

impl BenchGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenchGroup::Proving => "proving",
            BenchGroup::Generation => "generation",
        }
    }

    /// Name of the `[[bench]]` target the harness is pointed at.
    ///
    /// The target must exist in the benchmarked package; the harness exits
    /// non-zero for an unknown `--bench` name. The prover currently ships
    /// `opcodes`, so `Generation` needs a `trace_generation` target added
    /// there before it can run.
    pub fn bench_target(&self) -> &'static str {
        match self {
            BenchGroup::Proving => "opcodes",
            BenchGroup::Generation => "trace_generation",
        }
    }

    pub fn from_generation_flag(generation: bool) -> Self {
        if generation {
            BenchGroup::Generation
        } else {
            BenchGroup::Proving
        }
    }
}

impl std::fmt::Display for BenchGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_flag_selects_group() {
        assert_eq!(BenchGroup::from_generation_flag(false), BenchGroup::Proving);
        assert_eq!(
            BenchGroup::from_generation_flag(true),
            BenchGroup::Generation
        );
        assert_eq!(BenchGroup::default(), BenchGroup::Proving);
    }

    #[test]
    fn test_groups_map_to_distinct_targets() {
        assert_eq!(BenchGroup::Proving.bench_target(), "opcodes");
        assert_eq!(BenchGroup::Generation.bench_target(), "trace_generation");
        assert_ne!(
            BenchGroup::Proving.bench_target(),
            BenchGroup::Generation.bench_target()
        );
    }
}
