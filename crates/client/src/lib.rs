//! Duplex RPC client for child-process SQL tooling services.
//!
//! An [`RpcClient`] owns one connection to one native helper process: it
//! spawns the child, performs the initialize/capability handshake on
//! behalf of its [`ClientFeature`]s, correlates typed requests with their
//! responses, and tears everything down on [`stop`](RpcClient::stop).
//!
//! There is no reconnect path. A stopped or failed client stays dead;
//! callers construct a fresh one instead.

pub use error::ClientError;
pub use feature::{ClientFeature, Registration};
pub use options::{ServerOptions, TransportKind};

use protocol::{
    ClientCapabilities, InitializeParams, InitializeRequest, Request, RequestMessage,
    ServerMessage, codec,
};
use serde_json::Value;
use sqlkit::Disposable;
use std::{
    collections::HashMap,
    process::Stdio,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};
use tokio::{
    io::{AsyncBufRead, AsyncWrite, BufReader},
    process::{Child, Command},
    sync::oneshot,
    task::JoinHandle,
};

mod error;
mod feature;
mod options;

type Waiter = oneshot::Sender<Result<Value, ClientError>>;
type BoxReader = Box<dyn AsyncBufRead + Send + Unpin>;
type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// A live RPC connection to one server process.
///
/// Cheap to clone; clones share the connection. The client is the sole
/// owner of its transport: no other component sends its message types
/// over this connection.
pub struct RpcClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    next_id: AtomicU64,
    closed: AtomicBool,
    pending: Mutex<HashMap<u64, Waiter>>,
    writer: tokio::sync::Mutex<BoxWriter>,
    reader_task: Mutex<Option<JoinHandle<()>>>,
    child: Mutex<Option<Child>>,
    registrations: Mutex<Vec<Registration>>,
    features: Mutex<Vec<Disposable>>,
}

impl RpcClient {
    /// Spawn the server process described by `options` and run the
    /// initialize handshake for `features`.
    ///
    /// On failure the process is torn down and the error is returned;
    /// callers must not retry automatically.
    pub async fn start(
        options: ServerOptions,
        features: Vec<Box<dyn ClientFeature>>,
    ) -> Result<Self, ClientError> {
        let TransportKind::Stdio = options.transport;

        tracing::debug!(command = %options.command.display(), "starting server process");
        let mut child = Command::new(&options.command)
            .args(&options.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(ClientError::Spawn)?;

        let stdin = child.stdin.take().expect("child stdin piped");
        let stdout = child.stdout.take().expect("child stdout piped");

        Self::connect(
            Box::new(BufReader::new(stdout)),
            Box::new(stdin),
            Some(child),
            features,
        )
        .await
    }

    /// Run the client over an existing duplex transport.
    ///
    /// Used directly by tests to pair the client with a simulated server.
    pub async fn start_with_transport(
        reader: impl AsyncBufRead + Send + Unpin + 'static,
        writer: impl AsyncWrite + Send + Unpin + 'static,
        features: Vec<Box<dyn ClientFeature>>,
    ) -> Result<Self, ClientError> {
        Self::connect(Box::new(reader), Box::new(writer), None, features).await
    }

    async fn connect(
        reader: BoxReader,
        writer: BoxWriter,
        child: Option<Child>,
        features: Vec<Box<dyn ClientFeature>>,
    ) -> Result<Self, ClientError> {
        let inner = Arc::new(ClientInner {
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
            pending: Mutex::new(HashMap::new()),
            writer: tokio::sync::Mutex::new(writer),
            reader_task: Mutex::new(None),
            child: Mutex::new(child),
            registrations: Mutex::new(Vec::new()),
            features: Mutex::new(Vec::new()),
        });

        let task = tokio::spawn(read_loop(Arc::clone(&inner), reader));
        *inner.reader_task.lock().expect("reader lock poisoned") = Some(task);

        let client = Self { inner };

        let mut capabilities = ClientCapabilities::default();
        for feature in &features {
            feature.fill_client_capabilities(&mut capabilities);
        }

        let params = InitializeParams {
            process_id: std::process::id(),
            capabilities,
        };
        let result = match client.send_request::<InitializeRequest>(params).await {
            Ok(result) => result,
            Err(e) => {
                client.stop();
                return Err(e);
            }
        };
        tracing::debug!("capabilities exchanged, registering features");

        for feature in &features {
            let disposable = feature.initialize(&client, &result.capabilities);
            client
                .inner
                .features
                .lock()
                .expect("features lock poisoned")
                .push(disposable);
        }

        Ok(client)
    }

    /// Issue one typed request and await its correlated response.
    ///
    /// Server-side errors and undecodable payloads pass through unchanged
    /// as [`ClientError`]s; there is no retry, caching, or cancellation.
    pub async fn send_request<R: Request>(&self, params: R::Params) -> Result<R::Result, ClientError> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(ClientError::ConnectionClosed);
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.inner
            .pending
            .lock()
            .expect("pending lock poisoned")
            .insert(id, tx);

        let msg = RequestMessage::new::<R>(id, params);
        {
            let mut writer = self.inner.writer.lock().await;
            if let Err(e) = codec::write_message(&mut *writer, &msg).await {
                self.inner
                    .pending
                    .lock()
                    .expect("pending lock poisoned")
                    .remove(&id);
                return Err(ClientError::Transport(e));
            }
        }

        match rx.await {
            Ok(Ok(value)) => serde_json::from_value(value).map_err(ClientError::Deserialize),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ClientError::ConnectionClosed),
        }
    }

    /// Record a dynamic registration of message types on this connection.
    pub fn register(&self, registration: Registration) {
        tracing::debug!(id = %registration.id, "registering message types");
        self.inner
            .registrations
            .lock()
            .expect("registrations lock poisoned")
            .push(registration);
    }

    /// Snapshot of the registrations recorded so far.
    pub fn registrations(&self) -> Vec<Registration> {
        self.inner
            .registrations
            .lock()
            .expect("registrations lock poisoned")
            .clone()
    }

    /// Whether the connection has been stopped or has failed.
    pub fn is_stopped(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Stop the client: dispose feature registrations, abort the reader,
    /// kill the server process, and fail all pending requests.
    ///
    /// Idempotent: stopping an already-stopped client is a no-op.
    pub fn stop(&self) {
        let already = self.inner.closed.swap(true, Ordering::AcqRel);
        if !already {
            tracing::debug!("stopping client");
        }

        let mut features = {
            let mut guard = self.inner.features.lock().expect("features lock poisoned");
            std::mem::take(&mut *guard)
        };
        for disposable in &mut features {
            disposable.dispose();
        }

        if let Some(task) = self
            .inner
            .reader_task
            .lock()
            .expect("reader lock poisoned")
            .take()
        {
            task.abort();
        }

        if let Some(mut child) = self.inner.child.lock().expect("child lock poisoned").take() {
            if let Err(e) = child.start_kill() {
                tracing::warn!("failed to kill server process: {e}");
            }
        }

        fail_pending(&self.inner);
    }
}

impl Clone for RpcClient {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// Decode frames until the transport closes, completing waiters as
/// responses arrive. Notifications are logged and dropped.
async fn read_loop(inner: Arc<ClientInner>, mut reader: BoxReader) {
    loop {
        match codec::read_message::<_, ServerMessage>(&mut reader).await {
            Ok(msg) if msg.is_response() => {
                let id = msg.id.expect("responses carry an id");
                let waiter = inner
                    .pending
                    .lock()
                    .expect("pending lock poisoned")
                    .remove(&id);
                match waiter {
                    Some(tx) => {
                        let outcome = match msg.error {
                            Some(err) => Err(ClientError::Rpc(err)),
                            None => Ok(msg.result.unwrap_or(Value::Null)),
                        };
                        let _ = tx.send(outcome);
                    }
                    None => tracing::warn!(id, "response for unknown request"),
                }
            }
            Ok(msg) => {
                let method = msg.method.as_deref().unwrap_or("<none>");
                tracing::debug!(method, "dropping server notification");
            }
            Err(codec::FrameError::ConnectionClosed) => {
                tracing::debug!("server transport closed");
                break;
            }
            Err(e) => {
                tracing::warn!("transport failure: {e}");
                break;
            }
        }
    }

    inner.closed.store(true, Ordering::Release);
    fail_pending(&inner);
}

fn fail_pending(inner: &ClientInner) {
    let pending = {
        let mut guard = inner.pending.lock().expect("pending lock poisoned");
        std::mem::take(&mut *guard)
    };
    for (_, tx) in pending {
        let _ = tx.send(Err(ClientError::ConnectionClosed));
    }
}
