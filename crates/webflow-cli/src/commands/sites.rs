//! `webflow sites`, `webflow collections` and `webflow publish-site`

use serde_json::Value;
use webflow_client::WebflowClient;
use webflow_core::error::WebflowResult;

use super::CommandContext;

/// Execute the `webflow sites` command
pub async fn list(ctx: &CommandContext) -> WebflowResult<()> {
    let sites = ctx.client()?.list_sites().await?;
    ctx.output.json(&Value::Array(sites));
    Ok(())
}

/// Execute the `webflow collections <site>` command
pub async fn collections(site: String, ctx: &CommandContext) -> WebflowResult<()> {
    let collections = ctx.client()?.site(site).get_collections().await?;
    ctx.output.json(&Value::Array(collections));
    Ok(())
}

/// Execute the `webflow publish-site <site>` command
pub async fn publish(site: String, domains: Vec<String>, ctx: &CommandContext) -> WebflowResult<()> {
    let response = publish_site(&ctx.client()?, site, domains).await?;
    ctx.output.success("Site queued for publishing");
    ctx.output.json(&response);
    Ok(())
}

/// Publish to the given domains, or to every domain of the site when none
/// are given
pub async fn publish_site(client: &WebflowClient, site: String, domains: Vec<String>) -> WebflowResult<Value> {
    let domains = if domains.is_empty() { None } else { Some(domains) };
    client.site(site).publish(domains).await
}
