//! Launch description consumed by [`RpcClient::start`](crate::RpcClient::start).

use std::path::PathBuf;

/// Transport connecting the client to the server process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Framed messages over the child's stdin/stdout.
    Stdio,
}

/// How to launch a server process and reach it.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Path to the server executable.
    pub command: PathBuf,
    /// Arguments passed on launch.
    pub args: Vec<String>,
    /// Transport carrying the RPC frames.
    pub transport: TransportKind,
}
