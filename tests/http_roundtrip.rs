//! End-to-end: serve the router on a local port and drive it with the
//! blocking client, the way a game script would.

use keygate::client::http::KeyGateClient;
use keygate::server::{self, AppState};
use keygate::{ClientConfig, KeyGateConfig, KeyGateError, KeyService, KeyStatus, KeyStore};
use std::collections::HashSet;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::{spawn_blocking, JoinHandle};

async fn spawn_server(
    store: KeyStore,
) -> (SocketAddr, oneshot::Sender<()>, JoinHandle<std::io::Result<()>>) {
    let config = KeyGateConfig::default();
    let service = KeyService::new(store, &config).unwrap();
    let state = AppState::new(service, &config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(server::serve(listener, state, async move {
        let _ = shutdown_rx.await;
    }));
    (addr, shutdown_tx, handle)
}

fn client_for(addr: SocketAddr) -> KeyGateClient {
    let mut config = ClientConfig::new(format!("http://{}", addr));
    config.user_agent_product = "roundtrip-test".to_string();
    KeyGateClient::new(&config).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn generated_key_verifies_as_valid() {
    let (addr, shutdown_tx, handle) = spawn_server(KeyStore::new()).await;

    let (issued, status, unknown) = spawn_blocking(move || {
        let client = client_for(addr);
        let issued = client.generate_key().unwrap();
        let status = client.verify_key(&issued.key).unwrap();
        let unknown = client.verify_key("ZZZZ").unwrap();
        (issued, status, unknown)
    })
    .await
    .unwrap();

    assert_eq!(issued.key.len(), 16);
    assert_eq!(issued.expires_at - issued.created_at, 86_400_000);
    assert_eq!(status, KeyStatus::Valid);
    assert_eq!(unknown, KeyStatus::Invalid);

    let _ = shutdown_tx.send(());
    handle.await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn repeated_generation_yields_distinct_keys() {
    let (addr, shutdown_tx, handle) = spawn_server(KeyStore::new()).await;

    let keys = spawn_blocking(move || {
        let client = client_for(addr);
        (0..50)
            .map(|_| client.generate_key().unwrap().key)
            .collect::<Vec<_>>()
    })
    .await
    .unwrap();

    let unique: HashSet<_> = keys.iter().collect();
    assert_eq!(unique.len(), keys.len());

    let _ = shutdown_tx.send(());
    handle.await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_fault_reaches_client_as_server_error() {
    let (addr, shutdown_tx, handle) = spawn_server(KeyStore::with_capacity_limit(1)).await;

    let second = spawn_blocking(move || {
        let client = client_for(addr);
        client.generate_key().unwrap();
        client.generate_key()
    })
    .await
    .unwrap();

    match second {
        Err(KeyGateError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to generate key");
        }
        other => panic!("expected server error, got {:?}", other),
    }

    let _ = shutdown_tx.send(());
    handle.await.unwrap().unwrap();
}
