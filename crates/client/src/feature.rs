//! Feature hooks driven by the client during capability negotiation.

use crate::RpcClient;
use protocol::{ClientCapabilities, ServerCapabilities};
use serde::Serialize;
use serde_json::Value;
use sqlkit::Disposable;

/// A capability the client negotiates and exposes on behalf of a provider.
///
/// The client drives the hooks in order: [`fill_client_capabilities`]
/// before the initialize request goes out, then [`initialize`] once the
/// server's capabilities arrive. `initialize` registers the feature's
/// message types and its provider object, returning the registration
/// handle the client retains until [`stop`](RpcClient::stop).
///
/// [`fill_client_capabilities`]: ClientFeature::fill_client_capabilities
/// [`initialize`]: ClientFeature::initialize
pub trait ClientFeature: Send + Sync {
    /// Wire methods this feature owns on the connection.
    fn message_types(&self) -> &'static [&'static str];

    /// Merge this feature's flags into the shared capabilities object.
    ///
    /// Must ensure nested namespaces rather than overwrite them: other
    /// features may already have populated siblings.
    fn fill_client_capabilities(&self, capabilities: &mut ClientCapabilities);

    /// React to the server's advertised capabilities: register message
    /// types and expose the provider. Returns the registration handle.
    fn initialize(&self, client: &RpcClient, capabilities: &ServerCapabilities) -> Disposable;
}

/// A dynamic registration of message types on the connection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Randomly generated registration identifier.
    pub id: String,
    /// Wire methods covered by this registration.
    pub methods: Vec<String>,
    /// Registration options. Always `None`; the catalog is static.
    pub register_options: Option<Value>,
}

impl Registration {
    /// Build a registration covering `methods` under the given id.
    pub fn new(id: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            id: id.into(),
            methods: methods.iter().map(|m| (*m).to_owned()).collect(),
            register_options: None,
        }
    }
}
