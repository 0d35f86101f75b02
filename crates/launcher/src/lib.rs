//! Process launcher for native SQL tooling services.
//!
//! Turns a [`ProviderConfig`] into something the RPC layer can start:
//! resolves the server executable (cached copy or delegated download),
//! assembles the deterministic launch argument list (log file, optional
//! tracing level), and prunes stale log files along the way.

pub use config::{HostConfig, ProviderConfig, global_data_dir};
pub use download::{Downloader, ServerProvider};
pub use launch::{launch_args, server_options};
pub use logs::{
    LOG_RETENTION, LOG_SUBDIR, PRUNE_LIMIT, log_file_path, prune_logs_older_than, prune_old_logs,
};

mod config;
mod download;
mod launch;
mod logs;
