//! Credentials capability negotiated on the RPC connection.

use crate::contracts::{
    DeleteCredentialParams, DeleteCredentialRequest, ReadCredentialParams, ReadCredentialRequest,
    SaveCredentialParams, SaveCredentialRequest,
};
use client::{ClientFeature, Registration, RpcClient};
use protocol::{ClientCapabilities, Request, ServerCapabilities, capabilities::ensure};
use serde_json::Value;
use sqlkit::{CredentialProvider, Disposable, ProviderRegistry};
use uuid::Uuid;

/// Capability namespace claimed in the client capabilities.
pub const FEATURE_NAME: &str = "credentials";

/// Registry id the provider is exposed under.
pub const PROVIDER_ID: &str = "credentials";

/// Negotiates the credential message types and exposes the provider.
pub struct CredentialsFeature {
    registry: ProviderRegistry,
}

impl CredentialsFeature {
    /// Wire methods owned by this feature.
    pub const MESSAGE_TYPES: &'static [&'static str] = &[
        DeleteCredentialRequest::METHOD,
        SaveCredentialRequest::METHOD,
        ReadCredentialRequest::METHOD,
    ];

    /// Create the feature, registering providers into `registry`.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }
}

impl ClientFeature for CredentialsFeature {
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
            .register_credential_provider(PROVIDER_ID, build_provider(client.clone()))
    }
}

/// Wire the provider operations to RPC calls on `client`.
///
/// Each operation issues exactly one request and returns the typed
/// response unmodified.
fn build_provider(client: RpcClient) -> CredentialProvider {
    let read_client = client.clone();
    let save_client = client.clone();
    let delete_client = client;

    CredentialProvider::new(
        move |credential_id| {
            let client = read_client.clone();
            Box::pin(async move {
                let credential = client
                    .send_request::<ReadCredentialRequest>(ReadCredentialParams { credential_id })
                    .await?;
                Ok(credential)
            })
        },
        move |credential_id, password| {
            let client = save_client.clone();
            Box::pin(async move {
                let saved = client
                    .send_request::<SaveCredentialRequest>(SaveCredentialParams {
                        credential_id,
                        password,
                    })
                    .await?;
                Ok(saved)
            })
        },
        move |credential_id| {
            let client = delete_client.clone();
            Box::pin(async move {
                let deleted = client
                    .send_request::<DeleteCredentialRequest>(DeleteCredentialParams {
                        credential_id,
                    })
                    .await?;
                Ok(deleted)
            })
        },
    )
}
