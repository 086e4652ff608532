use anyhow::Result;
use mongodb::{Client, Database};
use tracing::info;

/// Connects to MongoDB and returns a handle to the named database.
pub async fn connect(url: &str, database: &str) -> Result<Database> {
    info!("Connecting to MongoDB...");

    let client = Client::with_uri_str(url).await?;
    let db = client.database(database);

    info!("MongoDB client established (database: {database})");
    Ok(db)
}
