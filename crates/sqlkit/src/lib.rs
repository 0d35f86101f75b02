//! Host-side capability surface for SQL tooling services.
//!
//! Native helper processes (credential store, Azure resource provider)
//! are fronted by thin RPC shims. Those shims expose their operations to
//! the host through the types in this crate: provider objects built from
//! async operations, registered by name in a [`ProviderRegistry`], with a
//! [`Disposable`] handle for de-registration.

pub use disposable::Disposable;
pub use provider::{CredentialProvider, OpFuture, ResourceProvider, ResourceProviderInfo};
pub use registry::ProviderRegistry;
pub use types::{
    Account, AccountKey, CreateFirewallRuleResponse, Credential, FirewallRuleInfo,
    HandleFirewallRuleResponse,
};

mod disposable;
mod provider;
mod registry;
mod types;
