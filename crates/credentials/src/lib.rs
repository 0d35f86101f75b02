//! Credential storage fronted by a native helper process.
//!
//! One secret per service identifier. The native credential service is
//! resolved (or downloaded), launched with a fresh log file, and exposed
//! to the host as a [`CredentialProvider`](sqlkit::CredentialProvider)
//! through the capability registry.

pub use feature::{CredentialsFeature, FEATURE_NAME, PROVIDER_ID};

use anyhow::{Context, Result, bail};
use client::RpcClient;
use launcher::{Downloader, HostConfig, ProviderConfig, ServerProvider, server_options};
use std::sync::Mutex;

pub mod contracts;
mod feature;

/// Acceptable native credential service binaries, in preference order.
pub const EXECUTABLE_FILES: &[&str] = &[
    "MicrosoftSqlToolsCredentials.exe",
    "MicrosoftSqlToolsCredentials",
];

/// Log file prefix for the credential service.
pub const LOG_PREFIX: &str = "credentialstore";

enum State {
    Unstarted,
    Starting,
    Registered(RpcClient),
    Disposed,
}

/// Launches the native credential service and keeps its provider
/// registered for the shim's lifetime.
///
/// Lifecycle is one-directional: once started (successfully or not), the
/// store cannot be started again; construct a new instance instead.
pub struct CredentialStore<D> {
    server: ServerProvider<D>,
    registry: sqlkit::ProviderRegistry,
    host: HostConfig,
    state: Mutex<State>,
}

impl<D: Downloader> CredentialStore<D> {
    /// Create a store from a base download config.
    ///
    /// The config is cloned defensively with the credential service's
    /// executable names substituted.
    pub fn new(
        base_config: &ProviderConfig,
        downloader: D,
        registry: sqlkit::ProviderRegistry,
        host: HostConfig,
    ) -> Self {
        let config = ProviderConfig::for_executables(base_config, EXECUTABLE_FILES);
        Self {
            server: ServerProvider::new(config, downloader),
            registry,
            host,
            state: Mutex::new(State::Unstarted),
        }
    }

    /// Resolve the service binary, launch it, and register the provider.
    ///
    /// On failure the capability stays unavailable and the store is left
    /// disposed; callers must not retry automatically.
    pub async fn start(&self) -> Result<()> {
        {
            let mut state = self.state.lock().expect("state lock poisoned");
            match *state {
                State::Unstarted => *state = State::Starting,
                _ => bail!("credential store already started"),
            }
        }

        match self.launch().await {
            Ok(client) => {
                *self.state.lock().expect("state lock poisoned") = State::Registered(client);
                tracing::info!("credential provider registered");
                Ok(())
            }
            Err(e) => {
                *self.state.lock().expect("state lock poisoned") = State::Disposed;
                Err(e)
            }
        }
    }

    async fn launch(&self) -> Result<RpcClient> {
        let executable = self
            .server
            .get_or_download()
            .await
            .context("failed to resolve credential service binary")?;
        let options = server_options(executable, LOG_PREFIX, &self.host);
        let feature = CredentialsFeature::new(self.registry.clone());
        let client = RpcClient::start(options, vec![Box::new(feature)])
            .await
            .context("failed to start credential service")?;
        Ok(client)
    }

    /// Stop the underlying client and de-register the provider.
    ///
    /// Idempotent: disposing twice, or with no client running, is a
    /// no-op.
    pub fn dispose(&self) {
        let mut state = self.state.lock().expect("state lock poisoned");
        if let State::Registered(client) = &*state {
            client.stop();
        }
        *state = State::Disposed;
    }
}
