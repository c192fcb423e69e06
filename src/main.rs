use arrangement_server::api::routes::create_router;
use arrangement_server::config::AppConfig;
use arrangement_server::store::SqliteStore;
use axum::serve;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    println!("Arrangement Manager Server");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    println!("Opening SQLite database...");
    let database_url = config.database_url()?;
    let sqlite_store =
        SqliteStore::new(&database_url, config.database.max_connections.unwrap_or(5)).await?;

    println!("Running database migrations...");
    sqlite_store.migrate().await?;
    println!("Database ready");

    let store = Arc::new(sqlite_store);

    run_server(create_router().with_state(store), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!(
        "Arrangement Manager server running on http://{}",
        bind_address
    );

    serve(listener, app).await?;

    Ok(())
}
