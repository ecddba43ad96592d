use std::sync::Arc;

use anyhow::{Context, Result};
use contact_api::config::{self, AppConfig};
use contact_api::store::{
    postgres, MemoryContactStore, MemoryCredentialStore, PgContactStore, PgCredentialStore,
};
use contact_api::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, CONTACT_API_USER, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Contact API in {:?} mode", config.environment);

    let state = build_state(config)
        .await
        .unwrap_or_else(|e| panic!("failed to initialize store: {:#}", e));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Contact API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.expect("server");
}

/// Pick the store backend from configuration and seed the configured
/// admin credentials into the user store.
async fn build_state(config: &AppConfig) -> Result<AppState> {
    let seed = config
        .auth
        .seed_username
        .as_deref()
        .zip(config.auth.seed_password.as_deref());

    match &config.database.url {
        Some(url) => {
            let pool = postgres::connect(url, config.database.max_connections)
                .await
                .context("connecting to postgres")?;
            let users = PgCredentialStore::new(pool.clone());
            if let Some((username, password)) = seed {
                users
                    .upsert_user(username, password)
                    .await
                    .context("seeding admin user")?;
            }
            Ok(AppState {
                contacts: Arc::new(PgContactStore::new(pool)),
                users: Arc::new(users),
            })
        }
        None => {
            tracing::warn!("DATABASE_URL not set; contacts will not survive a restart");
            let users = MemoryCredentialStore::default();
            if let Some((username, password)) = seed {
                users.add_user(username, password).await;
            }
            Ok(AppState {
                contacts: Arc::new(MemoryContactStore::default()),
                users: Arc::new(users),
            })
        }
    }
}
