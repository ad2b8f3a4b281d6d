//! Synthetic harness output trees.
//!
//! Writes criterion-shaped `estimates.json` files with deterministic values so
//! extraction and report writing can be exercised without running real
//! benchmarks.
//!
//! # Layout
//!
//! ```text
//! <root>/<group>/<bench_NNNN>/new/estimates.json
//! <root>/<group>/<bench_NNNN>/base/estimates.json   (decoy, different values)
//! ```

use std::fs;
use std::io;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use crate::extract::{ESTIMATES_FILE, RUN_DIR};
use crate::schema::BenchmarkResult;

#[derive(Debug, Clone)]
pub struct FixtureConfig {
    /// Number of benchmarks to write.
    pub count: usize,
    /// Group directory the benchmarks live under.
    pub group: String,
    pub seed: u64,
    /// Also write `base/estimates.json` next to each `new/`.
    pub with_baseline: bool,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            count: 16,
            group: "opcodes".to_string(),
            seed: 42,
            with_baseline: true,
        }
    }
}

/// Write one `estimates.json` into `dir`, creating it if needed.
pub fn write_estimate(dir: &Path, mean: f64, lower: f64, upper: f64) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let stat = |point: f64, lo: f64, hi: f64| {
        json!({
            "confidence_interval": {
                "confidence_level": 0.95,
                "lower_bound": lo,
                "upper_bound": hi,
            },
            "point_estimate": point,
            "standard_error": (hi - lo) / 4.0,
        })
    };
    let doc = json!({
        "mean": stat(mean, lower, upper),
        "median": stat(mean, lower, upper),
        "median_abs_dev": stat(0.0, 0.0, 0.0),
        "slope": null,
        "std_dev": stat(0.0, 0.0, 0.0),
    });
    let body = serde_json::to_string(&doc).map_err(io::Error::other)?;
    fs::write(dir.join(ESTIMATES_FILE), body)
}

fn sample(rng: &mut ChaCha8Rng) -> (f64, f64, f64) {
    // Whole nanoseconds plus a half step keep the values exact in JSON.
    let mean = rng.gen_range(100u64..5_000_000) as f64 + 0.5;
    let spread = rng.gen_range(1u64..1_000) as f64;
    (mean, mean - spread, mean + spread)
}

/// Write `config.count` benchmarks under `root` and return the results the
/// extractor should produce for them, in discovery order.
pub fn write_tree(root: &Path, config: &FixtureConfig) -> io::Result<Vec<BenchmarkResult>> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let group_dir = root.join(&config.group);
    let mut expected = Vec::with_capacity(config.count);

    for i in 0..config.count {
        let name = format!("bench_{i:04}");
        let bench_dir = group_dir.join(&name);

        let (mean, lower, upper) = sample(&mut rng);
        write_estimate(&bench_dir.join(RUN_DIR), mean, lower, upper)?;

        if config.with_baseline {
            let (b_mean, b_lower, b_upper) = sample(&mut rng);
            write_estimate(&bench_dir.join("base"), b_mean, b_lower, b_upper)?;
        }

        expected.push(BenchmarkResult {
            benchmark: name,
            mean_ns: mean,
            ci_lower: lower,
            ci_upper: upper,
        });
    }

    Ok(expected)
}
