//! Server binary resolution.

use crate::ProviderConfig;
use anyhow::Result;
use std::path::PathBuf;

/// The external download service.
///
/// Fetching is out of this crate's hands; implementations install the
/// binary described by the config and return the executable path.
pub trait Downloader: Send + Sync {
    /// Fetch the server binary, returning the installed executable path.
    fn download(
        &self,
        config: &ProviderConfig,
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
}

/// Resolves a provider's server executable: cached copy first, download
/// otherwise.
pub struct ServerProvider<D> {
    config: ProviderConfig,
    downloader: D,
}

impl<D: Downloader> ServerProvider<D> {
    /// Create a resolver for `config` backed by `downloader`.
    pub fn new(config: ProviderConfig, downloader: D) -> Self {
        Self { config, downloader }
    }

    /// The config this resolver was built from.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Return the cached executable if one exists, otherwise delegate to
    /// the download service.
    ///
    /// On failure no process is started; callers must not retry
    /// automatically.
    pub async fn get_or_download(&self) -> Result<PathBuf> {
        if let Some(path) = self.cached() {
            tracing::debug!(path = %path.display(), "using cached server binary");
            return Ok(path);
        }

        tracing::info!("server binary not installed, downloading");
        self.downloader.download(&self.config).await
    }

    /// First entry of `executable_files` present in the install directory.
    fn cached(&self) -> Option<PathBuf> {
        self.config
            .executable_files
            .iter()
            .map(|file| self.config.install_directory.join(file))
            .find(|path| path.is_file())
    }
}
