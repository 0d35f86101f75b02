//! Provider objects exposed through the capability registry.
//!
//! A provider is a record of type-erased async operations. The RPC shims
//! build one by closing each operation over their live client, so callers
//! hold a plain value object with no knowledge of the transport behind it.

use crate::types::{
    Account, CreateFirewallRuleResponse, Credential, FirewallRuleInfo, HandleFirewallRuleResponse,
};
use anyhow::Result;
use compact_str::CompactString;
use std::{future::Future, pin::Pin, sync::Arc};

/// A type-erased future returned by a provider operation.
pub type OpFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

type ReadFn = Arc<dyn Fn(String) -> OpFuture<Credential> + Send + Sync>;
type SaveFn = Arc<dyn Fn(String, String) -> OpFuture<bool> + Send + Sync>;
type DeleteFn = Arc<dyn Fn(String) -> OpFuture<bool> + Send + Sync>;

/// Credential storage capability: one secret per service identifier.
pub struct CredentialProvider {
    read: ReadFn,
    save: SaveFn,
    delete: DeleteFn,
    handle: u32,
}

impl CredentialProvider {
    /// Initial registration handle. Each shim instance registers exactly
    /// once, so every provider carries this value.
    pub const HANDLE: u32 = 0;

    /// Build a provider from its three operations.
    pub fn new<R, S, D>(read: R, save: S, delete: D) -> Self
    where
        R: Fn(String) -> OpFuture<Credential> + Send + Sync + 'static,
        S: Fn(String, String) -> OpFuture<bool> + Send + Sync + 'static,
        D: Fn(String) -> OpFuture<bool> + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
            save: Arc::new(save),
            delete: Arc::new(delete),
            handle: Self::HANDLE,
        }
    }

    /// Registration handle of this provider.
    pub fn handle(&self) -> u32 {
        self.handle
    }

    /// Read the credential stored for `credential_id`.
    pub async fn read_credential(&self, credential_id: &str) -> Result<Credential> {
        (self.read)(credential_id.to_owned()).await
    }

    /// Store `password` for `credential_id`. Returns whether the save
    /// succeeded.
    pub async fn save_credential(&self, credential_id: &str, password: &str) -> Result<bool> {
        (self.save)(credential_id.to_owned(), password.to_owned()).await
    }

    /// Delete the credential stored for `credential_id`. Returns whether
    /// an entry was removed.
    pub async fn delete_credential(&self, credential_id: &str) -> Result<bool> {
        (self.delete)(credential_id.to_owned()).await
    }
}

impl std::fmt::Debug for CredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialProvider")
            .field("handle", &self.handle)
            .finish()
    }
}

/// Identity of a registered resource provider.
#[derive(Debug, Clone)]
pub struct ResourceProviderInfo {
    /// Human-readable name shown by the host.
    pub display_name: CompactString,
    /// Unique provider identifier used for registry lookup.
    pub id: CompactString,
}

type CreateRuleFn =
    Arc<dyn Fn(Account, FirewallRuleInfo) -> OpFuture<CreateFirewallRuleResponse> + Send + Sync>;
type HandleRuleFn =
    Arc<dyn Fn(i32, String, String) -> OpFuture<HandleFirewallRuleResponse> + Send + Sync>;

/// Azure resource capability: firewall rule negotiation for SQL servers.
pub struct ResourceProvider {
    info: ResourceProviderInfo,
    create_firewall_rule: CreateRuleFn,
    handle_firewall_rule: HandleRuleFn,
}

impl ResourceProvider {
    /// Build a provider from its identity and two operations.
    pub fn new<C, H>(info: ResourceProviderInfo, create_firewall_rule: C, handle_firewall_rule: H) -> Self
    where
        C: Fn(Account, FirewallRuleInfo) -> OpFuture<CreateFirewallRuleResponse>
            + Send
            + Sync
            + 'static,
        H: Fn(i32, String, String) -> OpFuture<HandleFirewallRuleResponse> + Send + Sync + 'static,
    {
        Self {
            info,
            create_firewall_rule: Arc::new(create_firewall_rule),
            handle_firewall_rule: Arc::new(handle_firewall_rule),
        }
    }

    /// Identity of this provider.
    pub fn info(&self) -> &ResourceProviderInfo {
        &self.info
    }

    /// Create a firewall rule for `account` on the described server range.
    pub async fn create_firewall_rule(
        &self,
        account: Account,
        rule: FirewallRuleInfo,
    ) -> Result<CreateFirewallRuleResponse> {
        (self.create_firewall_rule)(account, rule).await
    }

    /// Ask the service whether a connection error indicates a missing
    /// firewall rule.
    pub async fn handle_firewall_rule(
        &self,
        error_code: i32,
        error_message: &str,
        connection_type_id: &str,
    ) -> Result<HandleFirewallRuleResponse> {
        (self.handle_firewall_rule)(
            error_code,
            error_message.to_owned(),
            connection_type_id.to_owned(),
        )
        .await
    }
}

impl std::fmt::Debug for ResourceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceProvider")
            .field("id", &self.info.id)
            .field("display_name", &self.info.display_name)
            .finish()
    }
}
