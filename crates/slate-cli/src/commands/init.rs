//! `slate init` command implementation.
//!
//! Creates the database (and its parent directory) if needed and applies the
//! embedded schema. Running it again is harmless.

use super::{ConfigArgs, open_store};
use anyhow::{Context, Result};

pub async fn run(args: ConfigArgs) -> Result<()> {
    let config = args.load()?;
    let location = args.storage_location(&config)?;

    println!("🚀 Initializing Slate database: {}", location.to_url());
    let store = open_store(&location, &config).await?;

    let tables = store
        .list_tables()
        .await
        .context("Failed to read back the schema")?;
    for table in &tables {
        println!("   ✓ {}", table);
    }
    if location.is_memory() {
        println!("⚠️  In-memory database: nothing was persisted.");
    }

    store.close().await;
    println!("✅ Schema ready ({} tables)", tables.len());
    Ok(())
}
