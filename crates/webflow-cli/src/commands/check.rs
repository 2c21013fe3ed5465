//! `webflow check` command implementation.
//!
//! Prints the merged configuration as TOML with the token redacted, the
//! files and variables it came from, and optionally validates the token.

use webflow_config::toml::serialize_webflow_toml;
use webflow_config::{ConfigSource, WebflowToml};
use webflow_core::error::WebflowResult;

use super::{client_options, CommandContext};

/// Execute the `webflow check` command
pub async fn execute(verify: bool, ctx: &CommandContext) -> WebflowResult<()> {
    ctx.output.step("🔍", "Resolved configuration");
    ctx.output.plain(&serialize_webflow_toml(&redacted(&ctx.config))?);

    if ctx.sources.is_empty() {
        ctx.output.info(&format!("No configuration found above {}, using defaults", ctx.cwd));
    }
    for source in &ctx.sources {
        ctx.output.info(&describe_source(source));
    }

    let options = client_options(&ctx.config);
    ctx.output.info(&format!(
        "Effective: {} retries every {}s, {} parallel requests, pages of {}",
        options.retry.max_retries,
        options.retry.retry_delay.as_secs(),
        options.pool_size,
        options.page_size
    ));

    match &ctx.config.api.token {
        None => ctx.output.warn("No API token configured"),
        Some(_) if verify => {
            let user = ctx.client()?.current_user().await?;
            ctx.output.success(&format!("Token accepted for {}", user.display_name()));
        }
        Some(_) => ctx.output.success("Configuration is valid"),
    }

    Ok(())
}

/// Copy of the configuration safe to print
pub fn redacted(config: &WebflowToml) -> WebflowToml {
    let mut config = config.clone();
    config.api.token = config.api.token.as_deref().map(redact_token);
    config
}

/// Keep only the last four characters of a token
pub fn redact_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "********".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("********{}", tail)
}

fn describe_source(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Global(path) => format!("from global config {}", path),
        ConfigSource::Project(path) => format!("from project config {}", path),
        ConfigSource::Environment(name) => format!("from environment variable {}", name),
        ConfigSource::CommandLine => "from command-line flags".to_string(),
    }
}
