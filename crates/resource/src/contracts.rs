//! Request catalog of the resource provider service.

use protocol::Request;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlkit::{Account, CreateFirewallRuleResponse, HandleFirewallRuleResponse};

/// Create a firewall rule for an account on a server's IP range.
pub enum CreateFirewallRuleRequest {}

/// Parameters of [`CreateFirewallRuleRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFirewallRuleParams {
    /// Account the rule is created under.
    pub account: Account,
    /// Fully qualified server name.
    pub server_name: String,
    /// First address of the allowed IP range.
    pub start_ip_address: String,
    /// Last address of the allowed IP range.
    pub end_ip_address: String,
    /// Security token per tenant.
    #[serde(default)]
    pub security_token_mappings: Map<String, Value>,
}

impl Request for CreateFirewallRuleRequest {
    const METHOD: &'static str = "resource/createFirewallRule";
    type Params = CreateFirewallRuleParams;
    type Result = CreateFirewallRuleResponse;
}

/// Ask whether a connection error calls for a firewall rule.
pub enum HandleFirewallRuleRequest {}

/// Parameters of [`HandleFirewallRuleRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleFirewallRuleParams {
    /// Error code from the failed connection.
    pub error_code: i32,
    /// Error message from the failed connection.
    pub error_message: String,
    /// Connection provider the error came from.
    pub connection_type_id: String,
}

impl Request for HandleFirewallRuleRequest {
    const METHOD: &'static str = "resource/handleFirewallRule";
    type Params = HandleFirewallRuleParams;
    type Result = HandleFirewallRuleResponse;
}
