use std::sync::Arc;

use anyhow::Result;
use contact_api::store::{MemoryContactStore, MemoryCredentialStore};
use contact_api::{app, AppState};

pub const TEST_USER: &str = "admin";
pub const TEST_PASSWORD: &str = "integration-secret";

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Start a fresh app on an ephemeral port: empty in-memory contact store
/// and a single registered user. Each test gets its own server so state
/// never leaks between tests.
pub async fn spawn_server() -> Result<TestServer> {
    let users = MemoryCredentialStore::default();
    users.add_user(TEST_USER, TEST_PASSWORD).await;

    let state = AppState {
        contacts: Arc::new(MemoryContactStore::default()),
        users: Arc::new(users),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("test server");
    });

    Ok(TestServer { base_url })
}
