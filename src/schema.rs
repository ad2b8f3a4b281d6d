use serde::{Deserialize, Serialize};

/// One benchmark's mean execution time as read back from the harness.
///
/// This is the record the dashboard consumes; field names are part of the
/// report format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub benchmark: String,
    pub mean_ns: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// The full `benchmarks.json` document: a bare JSON array of results in
/// discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    pub results: Vec<BenchmarkResult>,
}

impl Report {
    pub fn fastest(&self) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .min_by(|a, b| a.mean_ns.total_cmp(&b.mean_ns))
    }

    pub fn slowest(&self) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .max_by(|a, b| a.mean_ns.total_cmp(&b.mean_ns))
    }
}

impl From<Vec<BenchmarkResult>> for Report {
    fn from(results: Vec<BenchmarkResult>) -> Self {
        Self { results }
    }
}

/// `new/estimates.json` as written by criterion. Only the mean is read; the
/// other statistics in the file are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Estimates {
    pub mean: Estimate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Estimate {
    pub point_estimate: f64,
    pub confidence_interval: ConfidenceInterval,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfidenceInterval {
    pub lower_bound: f64,
    pub upper_bound: f64,
}
