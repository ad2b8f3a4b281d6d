//! Report output.
//!
//! The report is written to a temporary file beside the target and renamed
//! into place, so the dashboard never reads a half-written file. The
//! replacement keeps the mode of the report it replaces, and a symlinked
//! report path is written through to the file it points at.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::error::{PipelineError, Result};
use crate::schema::{BenchmarkResult, Report};

pub const REPORT_FILE: &str = "benchmarks.json";

/// Mode for a report that has no predecessor, before the umask.
#[cfg(unix)]
const FRESH_REPORT_MODE: u32 = 0o644;

/// Follow a symlinked report path so the rename replaces the link's target.
fn resolve_target(out_path: &Path) -> std::path::PathBuf {
    match fs::symlink_metadata(out_path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(out_path).unwrap_or_else(|_| out_path.to_path_buf())
        }
        _ => out_path.to_path_buf(),
    }
}

fn temp_beside(
    parent: &Path,
    existing: Option<fs::Permissions>,
) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".benchmarks").suffix(".json.tmp");

    #[cfg(unix)]
    if existing.is_none() {
        use std::os::unix::fs::PermissionsExt;
        // passed to open(2), so the process umask still applies
        builder.permissions(fs::Permissions::from_mode(FRESH_REPORT_MODE));
    }

    let tmp = builder.tempfile_in(parent)?;
    if let Some(perms) = existing {
        tmp.as_file().set_permissions(perms)?;
    }
    Ok(tmp)
}

/// Replace `out_path` with a pretty-printed JSON array of `results`.
pub fn write_report(results: &[BenchmarkResult], out_path: &Path) -> Result<()> {
    let failed = |reason: String| PipelineError::ReportWrite {
        path: out_path.to_path_buf(),
        reason,
    };

    let target = resolve_target(out_path);
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| failed(format!("creating {}: {e}", parent.display())))?;

    let existing = fs::metadata(&target).ok().map(|meta| meta.permissions());
    let tmp = temp_beside(parent, existing).map_err(|e| failed(e.to_string()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, results).map_err(|e| failed(e.to_string()))?;
        writer.write_all(b"\n").map_err(|e| failed(e.to_string()))?;
        writer.flush().map_err(|e| failed(e.to_string()))?;
    }
    tmp.persist(&target).map_err(|e| failed(e.error.to_string()))?;

    tracing::info!(path = %out_path.display(), count = results.len(), "wrote report");
    Ok(())
}

/// Load a previously written report.
pub fn read_report(path: &Path) -> Result<Report> {
    let failed = |reason: String| PipelineError::ReportWrite {
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| failed(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn add() -> BenchmarkResult {
        BenchmarkResult {
            benchmark: "add".into(),
            mean_ns: 120.5,
            ci_lower: 118.0,
            ci_upper: 123.0,
        }
    }

    #[test]
    fn test_write_creates_parents() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("docs").join("benches").join(REPORT_FILE);

        write_report(&[add()], &out).unwrap();

        let loaded = read_report(&out).unwrap();
        assert_eq!(loaded.results, vec![add()]);
    }

    #[test]
    fn test_empty_results_write_empty_array() {
        let dir = tempdir().unwrap();
        let out = dir.path().join(REPORT_FILE);

        write_report(&[], &out).unwrap();

        let raw = fs::read_to_string(&out).unwrap();
        assert_eq!(raw.trim(), "[]");
        assert!(read_report(&out).unwrap().results.is_empty());
    }

    #[test]
    fn test_write_overwrites_previous_report() {
        let dir = tempdir().unwrap();
        let out = dir.path().join(REPORT_FILE);
        fs::write(&out, "[{\"benchmark\":\"stale\"}]").unwrap();

        let mut second = add();
        second.benchmark = "sub".into();
        write_report(&[second.clone()], &out).unwrap();

        assert_eq!(read_report(&out).unwrap().results, vec![second]);
        // no temp files left behind
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_output_is_indented() {
        let dir = tempdir().unwrap();
        let out = dir.path().join(REPORT_FILE);
        write_report(&[add()], &out).unwrap();

        let raw = fs::read_to_string(&out).unwrap();
        assert!(raw.contains("\n  {\n    \"benchmark\": \"add\""));
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        for existing in [0o644, 0o640, 0o664] {
            let out = dir.path().join(format!("report_{existing:o}.json"));
            fs::write(&out, "[]").unwrap();
            fs::set_permissions(&out, fs::Permissions::from_mode(existing)).unwrap();

            write_report(&[add()], &out).unwrap();

            assert_eq!(mode(&out), existing);
            assert_eq!(read_report(&out).unwrap().results, vec![add()]);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_fresh_report_is_world_readable_under_umask() {
        let dir = tempdir().unwrap();
        let out = dir.path().join(REPORT_FILE);
        let plain = dir.path().join("plain.json");
        // same umask as the process, applied to a regular create
        fs::write(&plain, "[]").unwrap();

        write_report(&[add()], &out).unwrap();

        assert_eq!(mode(&out), mode(&plain) & FRESH_REPORT_MODE);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_report_is_written_through() {
        let dir = tempdir().unwrap();
        let real_dir = dir.path().join("site");
        fs::create_dir_all(&real_dir).unwrap();
        let real = real_dir.join(REPORT_FILE);
        fs::write(&real, "[]").unwrap();

        let docs = dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        let link = docs.join(REPORT_FILE);
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_report(&[add()], &link).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(read_report(&real).unwrap().results, vec![add()]);
    }
}
