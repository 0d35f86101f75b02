//! Credential store tests against a simulated native service.

use anyhow::{Result, bail};
use client::RpcClient;
use launcher::{Downloader, HostConfig, ProviderConfig};
use protocol::codec::{read_message, write_message};
use serde_json::{Value, json};
use sqlkit::ProviderRegistry;
use sqlkit_credentials::{CredentialStore, CredentialsFeature, PROVIDER_ID};
use std::path::PathBuf;
use tokio::io::BufReader;

type ServerHalves = (
    BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>,
    tokio::io::WriteHalf<tokio::io::DuplexStream>,
);

/// Start a client wired to an in-memory server, with the credentials
/// feature registered against `registry`.
async fn connect(registry: &ProviderRegistry) -> (RpcClient, ServerHalves, Value) {
    let (client_io, server_io) = tokio::io::duplex(64 * 1024);
    let (cr, cw) = tokio::io::split(client_io);
    let (sr, sw) = tokio::io::split(server_io);
    let mut server = (BufReader::new(sr), sw);

    let handshake = tokio::spawn(async move {
        let init: Value = read_message(&mut server.0).await.unwrap();
        let response = json!({
            "jsonrpc": "2.0",
            "id": init["id"],
            "result": { "capabilities": {} }
        });
        write_message(&mut server.1, &response).await.unwrap();
        (server, init)
    });

    let feature = CredentialsFeature::new(registry.clone());
    let client = RpcClient::start_with_transport(BufReader::new(cr), cw, vec![Box::new(feature)])
        .await
        .unwrap();
    let (server, init) = handshake.await.unwrap();
    (client, server, init)
}

#[tokio::test]
async fn save_credential_end_to_end() {
    let registry = ProviderRegistry::new();
    let (client, mut server, init) = connect(&registry).await;

    // The handshake advertised the nested capability flag.
    assert_eq!(
        init["params"]["capabilities"]["credentials"]["credentials"]["dynamicRegistration"],
        true
    );

    // One registration covering the three message types, no options.
    let registrations = client.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(
        registrations[0].methods,
        vec!["credential/delete", "credential/save", "credential/read"]
    );
    assert!(registrations[0].register_options.is_none());

    let server_task = tokio::spawn(async move {
        let req: Value = read_message(&mut server.0).await.unwrap();
        assert_eq!(req["method"], "credential/save");
        assert_eq!(
            req["params"],
            json!({ "credentialId": "svc1", "password": "p@ss" })
        );
        let response = json!({ "jsonrpc": "2.0", "id": req["id"], "result": true });
        write_message(&mut server.1, &response).await.unwrap();
    });

    let provider = registry
        .credential_provider(PROVIDER_ID)
        .expect("provider registered during initialize");
    let saved = provider.save_credential("svc1", "p@ss").await.unwrap();
    assert!(saved);

    server_task.await.unwrap();
    client.stop();
    // Stopping the client disposes the registration.
    assert!(registry.credential_provider(PROVIDER_ID).is_none());
}

#[tokio::test]
async fn read_credential_returns_typed_result() {
    let registry = ProviderRegistry::new();
    let (client, mut server, _init) = connect(&registry).await;

    let server_task = tokio::spawn(async move {
        let req: Value = read_message(&mut server.0).await.unwrap();
        assert_eq!(req["method"], "credential/read");
        assert_eq!(req["params"], json!({ "credentialId": "svc1" }));
        let response = json!({
            "jsonrpc": "2.0",
            "id": req["id"],
            "result": { "credentialId": "svc1", "password": "p@ss" }
        });
        write_message(&mut server.1, &response).await.unwrap();
    });

    let provider = registry.credential_provider(PROVIDER_ID).unwrap();
    let credential = provider.read_credential("svc1").await.unwrap();
    assert_eq!(credential.credential_id, "svc1");
    assert_eq!(credential.password, "p@ss");

    server_task.await.unwrap();
    client.stop();
}

#[tokio::test]
async fn delete_credential_error_passes_through() {
    let registry = ProviderRegistry::new();
    let (client, mut server, _init) = connect(&registry).await;

    let server_task = tokio::spawn(async move {
        let req: Value = read_message(&mut server.0).await.unwrap();
        assert_eq!(req["method"], "credential/delete");
        let response = json!({
            "jsonrpc": "2.0",
            "id": req["id"],
            "error": { "code": -32001, "message": "store locked" }
        });
        write_message(&mut server.1, &response).await.unwrap();
    });

    let provider = registry.credential_provider(PROVIDER_ID).unwrap();
    let err = provider.delete_credential("svc1").await.unwrap_err();
    assert!(err.to_string().contains("store locked"));

    server_task.await.unwrap();
    client.stop();
}

struct FailingDownloader;

impl Downloader for FailingDownloader {
    async fn download(&self, _config: &ProviderConfig) -> Result<PathBuf> {
        bail!("download service unreachable")
    }
}

fn unavailable_store() -> CredentialStore<FailingDownloader> {
    let tmp = std::env::temp_dir().join("sqlkit-missing-install");
    let base = ProviderConfig {
        install_directory: tmp,
        executable_files: Vec::new(),
        download: serde_json::Map::new(),
    };
    CredentialStore::new(
        &base,
        FailingDownloader,
        ProviderRegistry::new(),
        HostConfig::default(),
    )
}

#[tokio::test]
async fn failed_start_leaves_feature_unavailable() {
    let store = unavailable_store();

    let err = store.start().await.unwrap_err();
    assert!(err.to_string().contains("credential service binary"));

    // No retry path: the store is spent.
    let err = store.start().await.unwrap_err();
    assert!(err.to_string().contains("already started"));
}

#[tokio::test]
async fn dispose_is_idempotent() {
    let store = unavailable_store();

    // Dispose with no client, twice.
    store.dispose();
    store.dispose();

    // A disposed store cannot be started.
    let err = store.start().await.unwrap_err();
    assert!(err.to_string().contains("already started"));
}
