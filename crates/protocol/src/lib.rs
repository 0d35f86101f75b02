//! Wire protocol shared by the SQL tooling service clients.
//!
//! Requests follow the JSON-RPC 2.0 shape used by the language-client
//! transport the native services speak: a numeric id, a method name, and
//! a params payload, framed by [`codec`].

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

pub mod capabilities;
pub mod codec;

pub use capabilities::{
    ClientCapabilities, InitializeParams, InitializeRequest, InitializeResult, ServerCapabilities,
};

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// A typed request descriptor: the pairing of a method name with its
/// parameter and result shapes.
///
/// Implementations are unit types compiled into each client; they are
/// never constructed at runtime.
pub trait Request {
    /// Wire method name.
    const METHOD: &'static str;
    /// Parameter payload shape.
    type Params: Serialize + Send;
    /// Result payload shape.
    type Result: DeserializeOwned;
}

/// An outgoing request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RequestMessage<P> {
    /// Always [`JSONRPC_VERSION`].
    pub jsonrpc: &'static str,
    /// Client-assigned correlation id.
    pub id: u64,
    /// Wire method name.
    pub method: &'static str,
    /// Parameter payload.
    pub params: P,
}

impl<P: Serialize> RequestMessage<P> {
    /// Build the envelope for request type `R` with the given id.
    pub fn new<R>(id: u64, params: P) -> Self
    where
        R: Request<Params = P>,
    {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: R::METHOD,
            params,
        }
    }
}

/// An error object carried in a response.
///
/// Passed through to callers unchanged; the client performs no
/// interpretation or translation of server-side failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseError {
    /// Server-defined error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional structured detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "server error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ResponseError {}

/// Any message arriving from the server.
///
/// The transport carries responses to client requests and occasional
/// server-initiated notifications; the fields present decide which.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerMessage {
    /// Correlation id. Present on responses, absent on notifications.
    #[serde(default)]
    pub id: Option<u64>,
    /// Method name. Present on notifications and server-initiated requests.
    #[serde(default)]
    pub method: Option<String>,
    /// Notification payload.
    #[serde(default)]
    pub params: Option<Value>,
    /// Successful response payload.
    #[serde(default)]
    pub result: Option<Value>,
    /// Error response payload.
    #[serde(default)]
    pub error: Option<ResponseError>,
}

impl ServerMessage {
    /// Whether this message answers a client request.
    pub fn is_response(&self) -> bool {
        self.id.is_some() && self.method.is_none()
    }
}
