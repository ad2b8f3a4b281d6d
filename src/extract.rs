//! Reading benchmark estimates back out of the harness output tree.
//!
//! Criterion lays results out as
//! `<root>/<group>/<benchmark>/{base,change,new}/estimates.json`. Only the
//! `new` estimates describe the run that just finished.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{PipelineError, Result};
use crate::schema::{BenchmarkResult, Estimates};

pub const ESTIMATES_FILE: &str = "estimates.json";
pub const RUN_DIR: &str = "new";

fn is_new_estimate(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == ESTIMATES_FILE)
        && path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|n| n == RUN_DIR)
}

/// Lazily yields every `new/estimates.json` below `root`, in sorted
/// traversal order. Call again to restart the walk.
///
/// A missing `root` yields nothing.
pub fn estimate_files(root: &Path) -> impl Iterator<Item = Result<PathBuf>> + '_ {
    let walk = root
        .exists()
        .then(|| WalkDir::new(root).follow_links(false).sort_by_file_name());

    walk.into_iter()
        .flatten()
        .filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_file() && is_new_estimate(entry.path()) => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(source) => Some(Err(PipelineError::Walk {
                root: root.to_path_buf(),
                source,
            })),
        })
}

/// Benchmark id for an estimate file: the directory above `new/`.
pub fn benchmark_name(path: &Path) -> Option<String> {
    path.parent()?
        .parent()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

pub fn parse_estimate(path: &Path) -> Result<BenchmarkResult> {
    let malformed = |reason: String| PipelineError::MalformedEstimate {
        path: path.to_path_buf(),
        reason,
    };

    let benchmark =
        benchmark_name(path).ok_or_else(|| malformed("no benchmark directory above it".into()))?;
    let raw = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    let estimates: Estimates = serde_json::from_str(&raw).map_err(|e| malformed(e.to_string()))?;

    let mean = estimates.mean;
    Ok(BenchmarkResult {
        benchmark,
        mean_ns: mean.point_estimate,
        ci_lower: mean.confidence_interval.lower_bound,
        ci_upper: mean.confidence_interval.upper_bound,
    })
}

/// Parses every estimate under `root`. The first malformed file aborts the
/// whole extraction.
pub fn extract(root: &Path) -> Result<Vec<BenchmarkResult>> {
    let results = estimate_files(root)
        .map(|path| path.and_then(|p| parse_estimate(&p)))
        .collect::<Result<Vec<_>>>()?;

    if results.is_empty() {
        tracing::warn!(root = %root.display(), "no benchmark estimates found");
    } else {
        tracing::info!(count = results.len(), root = %root.display(), "extracted estimates");
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::write_estimate;
    use tempfile::tempdir;

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let results = extract(&dir.path().join("criterion")).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_tree_is_empty() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("report")).unwrap();
        assert!(extract(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_only_new_estimates_are_read() {
        let dir = tempdir().unwrap();
        let bench = dir.path().join("Add").join("prove");
        write_estimate(&bench.join("new"), 120.5, 118.0, 123.0).unwrap();
        write_estimate(&bench.join("base"), 999.0, 998.0, 1000.0).unwrap();
        write_estimate(&bench.join("change"), 0.1, 0.0, 0.2).unwrap();
        fs::write(bench.join("new").join("sample.json"), "{}").unwrap();

        let results = extract(dir.path()).unwrap();
        assert_eq!(
            results,
            vec![BenchmarkResult {
                benchmark: "prove".into(),
                mean_ns: 120.5,
                ci_lower: 118.0,
                ci_upper: 123.0,
            }]
        );
    }

    #[test]
    fn test_discovery_order_is_traversal_order() {
        let dir = tempdir().unwrap();
        write_estimate(&dir.path().join("g").join("sub").join("new"), 3.0, 2.0, 4.0).unwrap();
        write_estimate(&dir.path().join("g").join("add").join("new"), 1.0, 0.5, 1.5).unwrap();
        write_estimate(&dir.path().join("h").join("add").join("new"), 2.0, 1.5, 2.5).unwrap();

        let names: Vec<_> = extract(dir.path())
            .unwrap()
            .into_iter()
            .map(|r| (r.benchmark, r.mean_ns))
            .collect();
        // same leaf name in two groups is kept twice
        assert_eq!(
            names,
            vec![
                ("add".to_string(), 1.0),
                ("sub".to_string(), 3.0),
                ("add".to_string(), 2.0)
            ]
        );
    }

    #[test]
    fn test_estimate_files_is_restartable() {
        let dir = tempdir().unwrap();
        write_estimate(&dir.path().join("g").join("a").join("new"), 1.0, 0.0, 2.0).unwrap();

        let first: Vec<_> = estimate_files(dir.path()).map(|p| p.unwrap()).collect();
        let second: Vec<_> = estimate_files(dir.path()).map(|p| p.unwrap()).collect();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_bounds_is_fatal() {
        let dir = tempdir().unwrap();
        let new_dir = dir.path().join("g").join("broken").join("new");
        fs::create_dir_all(&new_dir).unwrap();
        fs::write(
            new_dir.join(ESTIMATES_FILE),
            r#"{"mean": {"point_estimate": 5.0}}"#,
        )
        .unwrap();
        write_estimate(&dir.path().join("g").join("ok").join("new"), 1.0, 0.0, 2.0).unwrap();

        let err = extract(dir.path()).unwrap_err();
        match err {
            PipelineError::MalformedEstimate { path, reason } => {
                assert!(path.ends_with("broken/new/estimates.json"));
                assert!(reason.contains("confidence_interval"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unparsable_json_is_fatal() {
        let dir = tempdir().unwrap();
        let new_dir = dir.path().join("g").join("garbage").join("new");
        fs::create_dir_all(&new_dir).unwrap();
        fs::write(new_dir.join(ESTIMATES_FILE), "not json").unwrap();

        assert!(matches!(
            extract(dir.path()),
            Err(PipelineError::MalformedEstimate { .. })
        ));
    }

    #[test]
    fn test_benchmark_name_is_grandparent() {
        let path = Path::new("target/criterion/Add/prove/new/estimates.json");
        assert_eq!(benchmark_name(path).as_deref(), Some("prove"));
        assert_eq!(benchmark_name(Path::new("estimates.json")), None);
    }
}
