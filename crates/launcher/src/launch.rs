//! Launch argument assembly.

use crate::{HostConfig, log_file_path, prune_old_logs};
use client::{ServerOptions, TransportKind};
use std::path::{Path, PathBuf};

/// Assemble launch options for a resolved server executable.
///
/// The argument list is deterministic: always `--log-file <path>`, plus
/// `--tracing-level <level>` when the host configuration has one set.
/// Stale logs for this provider are pruned first; pruning failures never
/// abort the launch.
pub fn server_options(executable: PathBuf, log_prefix: &str, host: &HostConfig) -> ServerOptions {
    let log_directory = host.log_directory();
    let log_file = log_file_path(&log_directory, log_prefix);

    if let Some(parent) = log_file.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(dir = %parent.display(), "failed to create log directory: {e}");
        }
    }

    let deleted = prune_old_logs(&log_directory, log_prefix);
    if !deleted.is_empty() {
        tracing::info!(count = deleted.len(), prefix = log_prefix, "pruned old log files");
    }
    tracing::info!(
        executable = %executable.display(),
        log_file = %log_file.display(),
        "server launch prepared"
    );

    ServerOptions {
        command: executable,
        args: launch_args(&log_file, host.tracing_level.as_deref()),
        transport: TransportKind::Stdio,
    }
}

/// The deterministic launch argument list.
pub fn launch_args(log_file: &Path, tracing_level: Option<&str>) -> Vec<String> {
    let mut args = vec!["--log-file".to_owned(), log_file.display().to_string()];
    if let Some(level) = tracing_level {
        args.push("--tracing-level".to_owned());
        args.push(level.to_owned());
    }
    args
}
