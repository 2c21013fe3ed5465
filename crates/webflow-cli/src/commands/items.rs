//! Item commands: listing, showing, bulk publish and bulk delete.

use serde_json::Value;
use webflow_client::WebflowClient;
use webflow_core::error::WebflowResult;

use super::CommandContext;

/// Execute the `webflow items <collection>` command
pub async fn list(collection: String, offset: u64, limit: u64, all: bool, ctx: &CommandContext) -> WebflowResult<()> {
    let items = fetch_items(&ctx.client()?, collection, offset, limit, all).await?;
    ctx.output.json(&items);
    Ok(())
}

/// One page of items, or the whole collection when `all` is set
pub async fn fetch_items(
    client: &WebflowClient,
    collection: String,
    offset: u64,
    limit: u64,
    all: bool,
) -> WebflowResult<Value> {
    let collection = client.collection(collection);
    if all {
        Ok(Value::Array(collection.get_all_items().await?))
    } else {
        Ok(Value::Array(collection.get_items(offset, limit).await?.items))
    }
}

/// Execute the `webflow item <collection> <id>` command
pub async fn show(collection: String, id: String, ctx: &CommandContext) -> WebflowResult<()> {
    let item = ctx.client()?.item(collection, id).get_data().await?;
    ctx.output.json(&item);
    Ok(())
}

/// Execute the `webflow publish-items` command
pub async fn publish(collection: String, ids: Vec<String>, ctx: &CommandContext) -> WebflowResult<()> {
    let count = ids.len();
    let merged = ctx.client()?.collection(collection).publish_items(ids).await?;
    report_errors(&merged, ctx);
    ctx.output.success(&format!("Requested publishing of {} items", count));
    ctx.output.json(&Value::Object(merged));
    Ok(())
}

/// Execute the `webflow delete-items` command
pub async fn delete(collection: String, ids: Vec<String>, ctx: &CommandContext) -> WebflowResult<()> {
    let count = ids.len();
    let merged = ctx.client()?.collection(collection).delete_items(ids).await?;
    report_errors(&merged, ctx);
    ctx.output.success(&format!("Requested deletion of {} items", count));
    ctx.output.json(&Value::Object(merged));
    Ok(())
}

/// Warn about per-item errors the API reported inside successful responses
fn report_errors(merged: &serde_json::Map<String, Value>, ctx: &CommandContext) {
    let errors = merged.get("errors").and_then(Value::as_array).map_or(0, Vec::len);
    if errors > 0 {
        ctx.output.warn(&format!("The API reported {} item errors", errors));
    }
}
