//! Server log file naming and retention.

use std::{
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

/// Subdirectory of the log directory holding service logs.
pub const LOG_SUBDIR: &str = "mssql";

/// Logs older than this are eligible for pruning.
pub const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Maximum deletions per pruning invocation.
pub const PRUNE_LIMIT: usize = 100;

/// Log file path for a provider: `<log_directory>/mssql/<prefix>_<pid>.log`.
///
/// The current process id keeps concurrently running hosts from
/// colliding; distinct prefixes keep providers within one host apart.
pub fn log_file_path(log_directory: &Path, prefix: &str) -> PathBuf {
    log_directory
        .join(LOG_SUBDIR)
        .join(format!("{prefix}_{}.log", std::process::id()))
}

/// Best-effort pruning of this provider's logs older than the retention
/// window. Returns the deleted paths; failures are logged and swallowed.
pub fn prune_old_logs(log_directory: &Path, prefix: &str) -> Vec<PathBuf> {
    let cutoff = SystemTime::now() - LOG_RETENTION;
    prune_logs_older_than(&log_directory.join(LOG_SUBDIR), prefix, cutoff, PRUNE_LIMIT)
}

/// Delete `.log` files in `dir` named `<prefix>_*` whose modification
/// time is before `cutoff`, up to `limit` deletions.
///
/// Never fails: an unreadable directory or a file that cannot be deleted
/// is logged and skipped.
pub fn prune_logs_older_than(
    dir: &Path,
    prefix: &str,
    cutoff: SystemTime,
    limit: usize,
) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "log directory not readable: {e}");
            return Vec::new();
        }
    };

    let marker = format!("{prefix}_");
    let mut deleted = Vec::new();

    for entry in entries.filter_map(|e| e.ok()) {
        if deleted.len() >= limit {
            break;
        }

        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "log") {
            continue;
        }
        let matches_prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&marker));
        if !matches_prefix {
            continue;
        }

        let modified = match entry.metadata().and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(_) => continue,
        };
        if modified >= cutoff {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => deleted.push(path),
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to delete old log: {e}");
            }
        }
    }

    deleted
}
