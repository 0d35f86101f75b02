//! Firewall capability negotiated on the RPC connection.

use crate::contracts::{
    CreateFirewallRuleParams, CreateFirewallRuleRequest, HandleFirewallRuleParams,
    HandleFirewallRuleRequest,
};
use client::{ClientFeature, Registration, RpcClient};
use protocol::{ClientCapabilities, Request, ServerCapabilities, capabilities::ensure};
use serde_json::Value;
use sqlkit::{
    Account, Disposable, FirewallRuleInfo, ProviderRegistry, ResourceProvider,
    ResourceProviderInfo,
};
use uuid::Uuid;

/// Capability namespace claimed in the client capabilities.
pub const FEATURE_NAME: &str = "firewall";

/// Registry id the provider is exposed under.
pub const PROVIDER_ID: &str = "Microsoft.Azure.SQL.ResourceProvider";

/// Display name shown by the host.
pub const DISPLAY_NAME: &str = "Azure SQL Resource Provider";

/// Negotiates the firewall message types and exposes the provider.
pub struct FirewallFeature {
    registry: ProviderRegistry,
}

impl FirewallFeature {
    /// Wire methods owned by this feature.
    pub const MESSAGE_TYPES: &'static [&'static str] = &[
        CreateFirewallRuleRequest::METHOD,
        HandleFirewallRuleRequest::METHOD,
    ];

    /// Create the feature, registering providers into `registry`.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }
}

impl ClientFeature for FirewallFeature {
    fn message_types(&self) -> &'static [&'static str] {
        Self::MESSAGE_TYPES
    }

    fn fill_client_capabilities(&self, capabilities: &mut ClientCapabilities) {
        ensure(capabilities.ensure(FEATURE_NAME), FEATURE_NAME)
            .insert("dynamicRegistration".to_owned(), Value::Bool(true));
    }

    fn initialize(&self, client: &RpcClient, _capabilities: &ServerCapabilities) -> Disposable {
        client.register(Registration::new(
            Uuid::new_v4().to_string(),
            Self::MESSAGE_TYPES,
        ));
        self.registry
            .register_resource_provider(build_provider(client.clone()))
    }
}

/// Wire the provider operations to RPC calls on `client`.
fn build_provider(client: RpcClient) -> ResourceProvider {
    let create_client = client.clone();
    let handle_client = client;

    ResourceProvider::new(
        ResourceProviderInfo {
            display_name: DISPLAY_NAME.into(),
            id: PROVIDER_ID.into(),
        },
        move |account, rule| {
            let client = create_client.clone();
            Box::pin(async move {
                let response = client
                    .send_request::<CreateFirewallRuleRequest>(as_create_firewall_rule_params(
                        account, rule,
                    ))
                    .await?;
                Ok(response)
            })
        },
        move |error_code, error_message, connection_type_id| {
            let client = handle_client.clone();
            Box::pin(async move {
                let response = client
                    .send_request::<HandleFirewallRuleRequest>(HandleFirewallRuleParams {
                        error_code,
                        error_message,
                        connection_type_id,
                    })
                    .await?;
                Ok(response)
            })
        },
    )
}

fn as_create_firewall_rule_params(
    account: Account,
    rule: FirewallRuleInfo,
) -> CreateFirewallRuleParams {
    CreateFirewallRuleParams {
        account,
        server_name: rule.server_name,
        start_ip_address: rule.start_ip_address,
        end_ip_address: rule.end_ip_address,
        security_token_mappings: rule.security_token_mappings,
    }
}
