//! Client error taxonomy.

use protocol::ResponseError;
use protocol::codec::FrameError;
use std::io;

/// Errors surfaced by [`RpcClient`](crate::RpcClient) operations.
#[derive(Debug)]
pub enum ClientError {
    /// The server process could not be spawned.
    Spawn(io::Error),
    /// Frame-level transport failure.
    Transport(FrameError),
    /// Server-side error object, passed through unchanged.
    Rpc(ResponseError),
    /// The response payload did not match the declared result shape.
    Deserialize(serde_json::Error),
    /// The connection is closed; pending and future requests fail.
    ConnectionClosed,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to spawn server process: {e}"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Rpc(e) => write!(f, "{e}"),
            Self::Deserialize(e) => write!(f, "malformed response payload: {e}"),
            Self::ConnectionClosed => write!(f, "connection closed"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::Rpc(e) => Some(e),
            Self::Deserialize(e) => Some(e),
            Self::ConnectionClosed => None,
        }
    }
}

impl From<FrameError> for ClientError {
    fn from(e: FrameError) -> Self {
        Self::Transport(e)
    }
}

impl From<ResponseError> for ClientError {
    fn from(e: ResponseError) -> Self {
        Self::Rpc(e)
    }
}
