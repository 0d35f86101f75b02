//! Capability negotiation types for the initialize handshake.

use crate::Request;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Feature flags the client advertises during initialization.
///
/// Modeled as a free-form nested object: each feature claims a namespace
/// with [`ClientCapabilities::ensure`] and sets its flags inside it.
/// Ensuring is a merge: an existing namespace keeps whatever sibling
/// flags other features already set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientCapabilities(pub Map<String, Value>);

impl ClientCapabilities {
    /// Get the object under `key`, inserting an empty one if absent.
    pub fn ensure(&mut self, key: &str) -> &mut Map<String, Value> {
        ensure(&mut self.0, key)
    }
}

/// Get the object stored at `key` in `object`, inserting an empty one if
/// absent. A non-object value under `key` is replaced.
pub fn ensure<'a>(object: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = object
        .entry(key.to_owned())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    entry.as_object_mut().expect("entry ensured to be an object")
}

/// Feature flags the server advertises in its initialize result.
///
/// Opaque to the client; features receive the whole object and decide
/// what to register.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerCapabilities(pub Map<String, Value>);

/// Parameters of the `initialize` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Process id of the host, for the server's diagnostics.
    pub process_id: u32,
    /// Capabilities the client supports.
    pub capabilities: ClientCapabilities,
}

/// Result of the `initialize` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitializeResult {
    /// Capabilities the server supports.
    #[serde(default)]
    pub capabilities: ServerCapabilities,
}

/// The `initialize` handshake request.
pub enum InitializeRequest {}

impl Request for InitializeRequest {
    const METHOD: &'static str = "initialize";
    type Params = InitializeParams;
    type Result = InitializeResult;
}
