//! Data types exchanged with the native tooling services.
//!
//! Field names serialize in camelCase; these structs travel verbatim as
//! RPC parameters and results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored credential: one secret per service identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Unique identifier for the service the credential belongs to.
    pub credential_id: String,
    /// The stored secret. Empty when the service has no entry.
    #[serde(default)]
    pub password: String,
}

/// Key uniquely identifying an account across providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    /// Identifier of the provider the account came from.
    pub provider_id: String,
    /// Identifier of the account within that provider.
    pub account_id: String,
}

/// An account known to the host (e.g. an Azure subscription login).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Provider-scoped account key.
    pub key: AccountKey,
    /// Display metadata, passed through untouched.
    #[serde(default)]
    pub display_info: Value,
    /// Provider-specific properties, passed through untouched.
    #[serde(default)]
    pub properties: Value,
    /// Whether the cached account data needs refreshing.
    #[serde(default)]
    pub is_stale: bool,
}

/// Parameters describing a firewall rule to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleInfo {
    /// Fully qualified server name the rule applies to.
    pub server_name: String,
    /// First address of the allowed IP range.
    pub start_ip_address: String,
    /// Last address of the allowed IP range.
    pub end_ip_address: String,
    /// Security token per tenant, passed through to the service.
    #[serde(default)]
    pub security_token_mappings: Map<String, Value>,
}

/// Result of a firewall rule creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFirewallRuleResponse {
    /// Whether the rule was created.
    pub result: bool,
    /// Error description when `result` is false.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Result of asking the service whether an error calls for a firewall rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleFirewallRuleResponse {
    /// Whether the error indicates a missing firewall rule.
    pub result: bool,
    /// Client IP address extracted from the error, when available.
    #[serde(default)]
    pub ip_address: Option<String>,
}
