//! # webflow-cli
//!
//! Command-line access to the Webflow CMS API.
//!
//! This is the main entry point for the `webflow` tool. It handles command parsing,
//! sets up logging and error handling, and dispatches to the appropriate command handlers.

use std::collections::HashMap;

use clap::{ColorChoice, Parser, Subcommand};
use tracing::{error, info};
use webflow_core::error::{WebflowError, WebflowResult};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Query and manage Webflow sites, collections and items
#[derive(Parser)]
#[command(name = "webflow", version, about = "Webflow CMS API client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API token (overrides WEBFLOW_API_TOKEN and config files)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API root URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Retries after a rate-limited response
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Seconds to wait between rate-limit retries
    #[arg(long, global = true)]
    pub retry_delay: Option<u64>,

    /// Simultaneous requests for parallel operations
    #[arg(long, global = true)]
    pub pool_size: Option<usize>,

    /// Items per page when listing a collection
    #[arg(long, global = true)]
    pub page_size: Option<u64>,

    /// When to style status and error output (auto honors NO_COLOR)
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the sites of the account
    Sites,
    /// List the collections of a site
    Collections {
        site: String,
    },
    /// List the items of a collection
    Items {
        collection: String,
        #[arg(long, default_value_t = 0, conflicts_with = "all")]
        offset: u64,
        #[arg(long, default_value_t = 100, conflicts_with = "all")]
        limit: u64,
        /// Fetch every page
        #[arg(long)]
        all: bool,
    },
    /// Show one item
    Item {
        collection: String,
        id: String,
    },
    /// Publish items of a collection
    PublishItems {
        collection: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete items of a collection
    DeleteItems {
        collection: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Publish a site
    PublishSite {
        site: String,
        /// Domain to publish to (repeatable; defaults to every domain)
        #[arg(long = "domain")]
        domains: Vec<String>,
    },
    /// Show the resolved configuration
    Check {
        /// Also validate the token against the API
        #[arg(long)]
        verify: bool,
    },
}

impl Cli {
    /// Settings given as flags, keyed the way the config layering expects
    pub fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        let mut set = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                overrides.insert(key.to_string(), value);
            }
        };

        set("token", self.token.clone());
        set("base_url", self.base_url.clone());
        set("max_retries", self.max_retries.map(|v| v.to_string()));
        set("retry_delay", self.retry_delay.map(|v| v.to_string()));
        set("pool_size", self.pool_size.map(|v| v.to_string()));
        set("page_size", self.page_size.map(|v| v.to_string()));

        overrides
    }
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting webflow CLI v{}", env!("CARGO_PKG_VERSION"));

    let color = cli.color;
    if let Err(e) = run_cli(cli) {
        eprintln!("{}", ErrorFormatter::new(color).format_error(&e));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> WebflowResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| WebflowError::io("Failed to create async runtime".to_string(), e))?;

    let overrides = cli.overrides();
    let color = cli.color;
    rt.block_on(async move {
        let ctx = CommandContext::new(overrides, color).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "webflow={},webflow_client={},webflow_config={}",
            level, level, level
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("webflow encountered an unexpected error: {}", panic_info);
        eprintln!("webflow crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/webflow-rs/webflow/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
