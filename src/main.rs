use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use movie_collection_api::cli::Cli;
use movie_collection_api::config;
use movie_collection_api::database::{DatabaseManager, MongoStore};
use movie_collection_api::services::prepare_database;
use movie_collection_api::{app, is_production, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up MONGO_URI, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::config();

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    tracing::info!("Starting movie collection API in {:?} mode", config.environment);
    if is_production!() && config.security.uses_default_secret() {
        tracing::warn!("JWT_SECRET is unset; tokens are signed with the built-in default");
    }

    let database = DatabaseManager::connect(&config.database).await?;
    let store = Arc::new(MongoStore::new(database.clone(), config.database.operation_timeout()));
    let state = AppState::new(store);

    // Index creation and seeding wait on server selection; serve meanwhile.
    let users = state.users.clone();
    tokio::spawn(async move {
        if let Err(e) = prepare_database(&database, &users, &config.bootstrap).await {
            tracing::warn!("Database preparation failed: {}", e);
        }
    });

    let bind_addr = format!("0.0.0.0:{}", cli.port(config.server.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
