use anyhow::Result;

use crate::client::WeaviateClient;

/// Print the Aggregate document count for a class (`wkb count`).
pub async fn run_count(client: &WeaviateClient, class: &str) -> Result<()> {
    let count = client.count_objects(class).await?;
    println!("Class '{}' contains {} documents", class, count);
    Ok(())
}
