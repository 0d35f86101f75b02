//! Named capability registry shared across the host.

use crate::{CredentialProvider, Disposable, ResourceProvider};
use compact_str::CompactString;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

/// Concurrent-safe registry of named providers.
///
/// Registration returns a [`Disposable`] that removes the entry. A second
/// registration under the same name replaces the first; each shim owns
/// exactly one registration, so replacement only happens when a new shim
/// instance takes over a name.
pub struct ProviderRegistry {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    credentials: BTreeMap<CompactString, Arc<CredentialProvider>>,
    resources: BTreeMap<CompactString, Arc<ResourceProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Register a credential provider under `id`.
    ///
    /// The returned handle removes the entry; it never touches the
    /// provider's backing process.
    pub fn register_credential_provider(
        &self,
        id: impl Into<CompactString>,
        provider: CredentialProvider,
    ) -> Disposable {
        let id = id.into();
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .credentials
            .insert(id.clone(), Arc::new(provider));

        let inner = Arc::clone(&self.inner);
        Disposable::new(move || {
            inner
                .lock()
                .expect("registry lock poisoned")
                .credentials
                .remove(&id);
        })
    }

    /// Look up a credential provider by id.
    pub fn credential_provider(&self, id: &str) -> Option<Arc<CredentialProvider>> {
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .credentials
            .get(id)
            .cloned()
    }

    /// Register a resource provider, keyed by its own `info.id`.
    pub fn register_resource_provider(&self, provider: ResourceProvider) -> Disposable {
        let id = provider.info().id.clone();
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .resources
            .insert(id.clone(), Arc::new(provider));

        let inner = Arc::clone(&self.inner);
        Disposable::new(move || {
            inner
                .lock()
                .expect("registry lock poisoned")
                .resources
                .remove(&id);
        })
    }

    /// Look up a resource provider by id.
    pub fn resource_provider(&self, id: &str) -> Option<Arc<ResourceProvider>> {
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .resources
            .get(id)
            .cloned()
    }

    /// Number of registered credential providers.
    pub fn credential_provider_count(&self) -> usize {
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .credentials
            .len()
    }

    /// Number of registered resource providers.
    pub fn resource_provider_count(&self) -> usize {
        self.inner
            .lock()
            .expect("registry lock poisoned")
            .resources
            .len()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ProviderRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().expect("registry lock poisoned");
        f.debug_struct("ProviderRegistry")
            .field("credentials", &inner.credentials.len())
            .field("resources", &inner.resources.len())
            .finish()
    }
}
