// ABOUTME: Server binary for the Zenilience wellness platform backend
// ABOUTME: Boots configuration, logging, database, LLM provider, and the HTTP router
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Zenilience Server Binary
//!
//! Starts the Zenilience REST API with user authentication, SQLite storage,
//! and the configured LLM provider.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use zenilience::{
    auth::AuthManager,
    config::environment::ServerConfig,
    database::Database,
    llm::ChatProvider,
    logging,
    resources::ServerResources,
    routes,
};

#[derive(Parser)]
#[command(name = "zenilience-server")]
#[command(about = "Zenilience wellness platform backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Zenilience server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url.to_connection_string()).await?;
    info!("Database initialized: {}", config.database.url.to_connection_string());

    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.token_expiry_hours,
    );

    let chat_provider = ChatProvider::from_env().unwrap_or_else(|e| {
        tracing::warn!(
            "LLM provider unavailable ({e}); falling back to the local endpoint. \
             Chat replies will use the fallback string until it is reachable."
        );
        ChatProvider::local()
    });

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        chat_provider,
        config,
    ));

    let app = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", http_port)).await?;
    info!("Listening on port {}", http_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {e}");
    }
}
