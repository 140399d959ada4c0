use anyhow::Result;

use crate::client::WeaviateClient;

/// List all classes in the remote schema (`wkb classes`).
pub async fn run_classes(client: &WeaviateClient) -> Result<()> {
    let classes = client.list_classes().await?;

    println!("Found {} classes:", classes.len());
    for class in &classes {
        println!(
            "  - {}: {}",
            class.class,
            class.description.as_deref().unwrap_or("(no description)")
        );
    }

    Ok(())
}
