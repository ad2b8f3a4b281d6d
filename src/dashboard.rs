use std::path::Path;

/// Static page that renders `benchmarks.json`. It is maintained by hand and
/// never generated here.
pub const DASHBOARD_FILE: &str = "index.html";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenceStatus {
    Present,
    Missing,
}

/// Look for the dashboard page in `out_dir`. A missing page is only a warning.
pub fn check(out_dir: &Path) -> PresenceStatus {
    let page = out_dir.join(DASHBOARD_FILE);
    if page.is_file() {
        tracing::info!(path = %page.display(), "found dashboard page");
        PresenceStatus::Present
    } else {
        tracing::warn!(
            dir = %out_dir.display(),
            "no {DASHBOARD_FILE} found; place the dashboard page there to view the report"
        );
        PresenceStatus::Missing
    }
}
