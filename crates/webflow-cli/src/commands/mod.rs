//! Command implementations and dispatch logic.
//!
//! This module contains all command handlers and the central dispatch system.
//! Each command is implemented as an async function that takes a CommandContext.

use std::collections::HashMap;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::ColorChoice;
use tracing::info;
use webflow_client::{ClientOptions, RetryPolicy, WebflowClient};
use webflow_config::{ConfigLoader, ConfigSource, WebflowToml};
use webflow_core::error::{WebflowError, WebflowResult};
use webflow_core::types::Credential;

pub mod check;
pub mod items;
pub mod sites;


use crate::{Commands, output::OutputHandler};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    pub config: WebflowToml,
    pub sources: Vec<ConfigSource>,
}

impl CommandContext {
    /// Create a new command context, resolving configuration from the
    /// current directory upwards
    pub async fn new(cli_overrides: HashMap<String, String>, color: ColorChoice) -> WebflowResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| WebflowError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| WebflowError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("Current directory is not valid UTF-8: {}", e),
        })?;

        let (config, sources) = ConfigLoader::new(cwd.clone()).load(cli_overrides).await?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(color),
            config,
            sources,
        })
    }

    /// Client built from the resolved configuration.
    ///
    /// Without a configured token the client is returned unauthenticated and
    /// every API call fails with `AuthNotSet`.
    pub fn client(&self) -> WebflowResult<WebflowClient> {
        let client = WebflowClient::new(client_options(&self.config))?;
        match &self.config.api.token {
            Some(token) => Ok(client.with_credential(Credential::new(token.as_str())?)),
            None => Ok(client),
        }
    }
}

/// Client tunables: configured values over the library defaults
pub fn client_options(config: &WebflowToml) -> ClientOptions {
    let defaults = ClientOptions::default();

    ClientOptions {
        base_url: config.api.base_url.clone().unwrap_or(defaults.base_url),
        retry: RetryPolicy::new(
            config.retry.max_retries.unwrap_or(defaults.retry.max_retries),
            config
                .retry
                .retry_delay_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.retry.retry_delay),
        ),
        pool_size: config.concurrency.pool_size.unwrap_or(defaults.pool_size),
        page_size: config.concurrency.page_size.unwrap_or(defaults.page_size),
        max_items_per_request: config
            .concurrency
            .max_items_per_request
            .unwrap_or(defaults.max_items_per_request),
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> WebflowResult<()> {
    match command {
        Commands::Sites => {
            info!("Listing sites");
            sites::list(ctx).await
        }
        Commands::Collections { site } => {
            info!("Listing collections of site {}", site);
            sites::collections(site, ctx).await
        }
        Commands::Items { collection, offset, limit, all } => {
            info!("Listing items of collection {} (all: {})", collection, all);
            items::list(collection, offset, limit, all, ctx).await
        }
        Commands::Item { collection, id } => {
            info!("Showing item {} of collection {}", id, collection);
            items::show(collection, id, ctx).await
        }
        Commands::PublishItems { collection, ids } => {
            info!("Publishing {} items of collection {}", ids.len(), collection);
            items::publish(collection, ids, ctx).await
        }
        Commands::DeleteItems { collection, ids } => {
            info!("Deleting {} items of collection {}", ids.len(), collection);
            items::delete(collection, ids, ctx).await
        }
        Commands::PublishSite { site, domains } => {
            info!("Publishing site {}", site);
            sites::publish(site, domains, ctx).await
        }
        Commands::Check { verify } => {
            info!("Checking configuration (verify: {})", verify);
            check::execute(verify, ctx).await
        }
    }
}
