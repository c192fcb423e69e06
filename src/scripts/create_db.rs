use anyhow::{bail, Result};
use arrangement_server::config::AppConfig;
use arrangement_server::store::SqliteStore;

/// Strip the sqlite URL scheme down to the filesystem path
fn database_file_path(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let database_url = config.database_url()?;
    let database_path = database_file_path(&database_url);

    if std::path::Path::new(database_path).exists() {
        bail!(
            "The database file already exists at {}. Delete it and try again.",
            database_path
        );
    }

    println!("Creating the database and tables...");
    let store =
        SqliteStore::new(&database_url, config.database.max_connections.unwrap_or(5)).await?;
    store.migrate().await?;

    if std::path::Path::new(database_path).exists() {
        println!(
            "Database and tables created successfully! File at: {}",
            database_path
        );
    } else {
        bail!("The database file was not created. Check the connection string.");
    }

    Ok(())
}
