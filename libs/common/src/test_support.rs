//! In-process fake backend for exercising the front ends over real HTTP

use std::net::SocketAddr;

use axum::Router;
use tempfile::TempDir;
use tokio::net::TcpListener;

use crate::client::PanelClient;
use crate::config::PanelConfig;

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake backend");
    let addr = listener.local_addr().expect("fake backend has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("fake backend stopped");
    });

    format!("http://{addr}")
}

/// Base URL on which nothing is listening
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind probe listener");
    let addr: SocketAddr = listener.local_addr().expect("probe listener has no address");
    drop(listener);
    format!("http://{addr}")
}

/// A client wired to a fake backend with its own token directory
pub struct Fixture {
    pub config: PanelConfig,
    pub client: PanelClient,
    _state_dir: TempDir,
}

impl Fixture {
    /// Start `router` and build a client against it
    pub async fn new(router: Router) -> Self {
        let base_url = spawn_backend(router).await;
        Self::with_base_url(base_url)
    }

    /// Build a client against an arbitrary base URL
    pub fn with_base_url(base_url: String) -> Self {
        let state_dir = tempfile::tempdir().expect("failed to create state dir");
        let config = PanelConfig::new(base_url, state_dir.path());
        let client = PanelClient::new(&config).expect("failed to build client");

        Self {
            config,
            client,
            _state_dir: state_dir,
        }
    }

    /// Store `token` as the current session
    pub fn logged_in(self, token: &str) -> Self {
        self.client
            .tokens()
            .save(token)
            .expect("failed to store token");
        self
    }

    /// Currently stored token
    pub fn token(&self) -> Option<String> {
        self.client.tokens().load().expect("failed to read token")
    }
}
