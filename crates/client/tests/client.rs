//! RPC client tests over an in-memory duplex transport.

use protocol::codec::{read_message, write_message};
use protocol::{ClientCapabilities, Request, ServerCapabilities};
use serde::Serialize;
use serde_json::{Value, json};
use sqlkit::Disposable;
use sqlkit_client::{ClientError, ClientFeature, Registration, RpcClient};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::io::BufReader;

enum EchoRequest {}

#[derive(Serialize)]
struct EchoParams {
    text: String,
}

impl Request for EchoRequest {
    const METHOD: &'static str = "test/echo";
    type Params = EchoParams;
    type Result = String;
}

type ClientHalves = (
    BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>,
    tokio::io::WriteHalf<tokio::io::DuplexStream>,
);
type ServerHalves = (
    BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>,
    tokio::io::WriteHalf<tokio::io::DuplexStream>,
);

fn transport_pair() -> (ClientHalves, ServerHalves) {
    let (client_io, server_io) = tokio::io::duplex(64 * 1024);
    let (cr, cw) = tokio::io::split(client_io);
    let (sr, sw) = tokio::io::split(server_io);
    ((BufReader::new(cr), cw), (BufReader::new(sr), sw))
}

/// Answer the initialize handshake and return the request envelope.
async fn accept_initialize(server: &mut ServerHalves) -> Value {
    let init: Value = read_message(&mut server.0).await.unwrap();
    assert_eq!(init["method"], "initialize");
    let response = json!({
        "jsonrpc": "2.0",
        "id": init["id"],
        "result": { "capabilities": {} }
    });
    write_message(&mut server.1, &response).await.unwrap();
    init
}

#[tokio::test]
async fn request_response_roundtrip() {
    let ((cr, cw), mut server) = transport_pair();

    let server_task = tokio::spawn(async move {
        accept_initialize(&mut server).await;

        let req: Value = read_message(&mut server.0).await.unwrap();
        assert_eq!(req["method"], "test/echo");
        assert_eq!(req["jsonrpc"], "2.0");
        let response = json!({
            "jsonrpc": "2.0",
            "id": req["id"],
            "result": req["params"]["text"]
        });
        write_message(&mut server.1, &response).await.unwrap();
    });

    let client = RpcClient::start_with_transport(cr, cw, Vec::new())
        .await
        .unwrap();
    let result = client
        .send_request::<EchoRequest>(EchoParams {
            text: "hello".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(result, "hello");

    server_task.await.unwrap();
    client.stop();
}

struct EchoFeature {
    disposed: Arc<AtomicBool>,
}

impl ClientFeature for EchoFeature {
    fn message_types(&self) -> &'static [&'static str] {
        &["test/echo"]
    }

    fn fill_client_capabilities(&self, capabilities: &mut ClientCapabilities) {
        protocol::capabilities::ensure(capabilities.ensure("test"), "test")
            .insert("dynamicRegistration".to_owned(), Value::Bool(true));
    }

    fn initialize(&self, client: &RpcClient, _capabilities: &ServerCapabilities) -> Disposable {
        client.register(Registration::new(
            uuid::Uuid::new_v4().to_string(),
            self.message_types(),
        ));
        let disposed = Arc::clone(&self.disposed);
        Disposable::new(move || {
            disposed.store(true, Ordering::SeqCst);
        })
    }
}

#[tokio::test]
async fn feature_negotiation_and_registration() {
    let ((cr, cw), mut server) = transport_pair();

    let server_task = tokio::spawn(async move { accept_initialize(&mut server).await });

    let disposed = Arc::new(AtomicBool::new(false));
    let feature = EchoFeature {
        disposed: Arc::clone(&disposed),
    };
    let client = RpcClient::start_with_transport(cr, cw, vec![Box::new(feature)])
        .await
        .unwrap();

    // The server saw the feature's nested capability flag.
    let init = server_task.await.unwrap();
    assert_eq!(
        init["params"]["capabilities"]["test"]["test"]["dynamicRegistration"],
        true
    );

    // One registration, random id, no register options.
    let registrations = client.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].methods, vec!["test/echo".to_owned()]);
    assert!(registrations[0].register_options.is_none());
    assert!(!registrations[0].id.is_empty());

    // Stopping disposes the feature registration, exactly once.
    assert!(!disposed.load(Ordering::SeqCst));
    client.stop();
    assert!(disposed.load(Ordering::SeqCst));
    client.stop();
}

#[tokio::test]
async fn rpc_error_passes_through() {
    let ((cr, cw), mut server) = transport_pair();

    let server_task = tokio::spawn(async move {
        accept_initialize(&mut server).await;

        let req: Value = read_message(&mut server.0).await.unwrap();
        let response = json!({
            "jsonrpc": "2.0",
            "id": req["id"],
            "error": { "code": -32000, "message": "credential store unavailable" }
        });
        write_message(&mut server.1, &response).await.unwrap();
    });

    let client = RpcClient::start_with_transport(cr, cw, Vec::new())
        .await
        .unwrap();
    let err = client
        .send_request::<EchoRequest>(EchoParams {
            text: "hello".to_owned(),
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Rpc(e) => {
            assert_eq!(e.code, -32000);
            assert_eq!(e.message, "credential store unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }

    server_task.await.unwrap();
    client.stop();
}

#[tokio::test]
async fn transport_close_fails_requests() {
    let ((cr, cw), mut server) = transport_pair();

    let server_task = tokio::spawn(async move {
        accept_initialize(&mut server).await;
        // Drop both halves: the connection is gone.
    });

    let client = RpcClient::start_with_transport(cr, cw, Vec::new())
        .await
        .unwrap();
    server_task.await.unwrap();

    let result = client
        .send_request::<EchoRequest>(EchoParams {
            text: "hello".to_owned(),
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn requests_after_stop_fail_fast() {
    let ((cr, cw), mut server) = transport_pair();

    let server_task = tokio::spawn(async move { accept_initialize(&mut server).await });

    let client = RpcClient::start_with_transport(cr, cw, Vec::new())
        .await
        .unwrap();
    server_task.await.unwrap();

    client.stop();
    assert!(client.is_stopped());

    let err = client
        .send_request::<EchoRequest>(EchoParams {
            text: "hello".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ConnectionClosed));
}

#[tokio::test]
async fn initialize_failure_rejects_start() {
    let ((cr, cw), mut server) = transport_pair();

    let server_task = tokio::spawn(async move {
        let _init: Value = read_message(&mut server.0).await.unwrap();
        // Close without answering.
    });

    let result = RpcClient::start_with_transport(cr, cw, Vec::new()).await;
    assert!(result.is_err());
    server_task.await.unwrap();
}
