//! Configuration layering, fallback logic, and environment overrides

use std::collections::HashMap;
use std::str::FromStr;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use webflow_core::error::WebflowError;
use crate::toml::{invalid, validate_config, WebflowToml};
use crate::{ConfigResult, CONFIG_FILE_NAME};

/// Prefix of environment variables read as overrides
pub const ENV_PREFIX: &str = "WEBFLOW_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Global config file
    Global(Utf8PathBuf),
    /// Project webflow.toml file
    Project(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Load the nearest webflow.toml, if any
    pub async fn load_project_config(&self) -> ConfigResult<Option<(WebflowToml, ConfigSource)>> {
        match self.find_config_path(CONFIG_FILE_NAME) {
            Some(path) => {
                debug!(path = %path, "Loading project configuration");
                let config = crate::toml::load_from_file(&path).await?;
                Ok(Some((config, ConfigSource::Project(path))))
            }
            None => Ok(None),
        }
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn find_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(filename))
            .find(|path| path.exists())
    }

    /// Path of the per-user configuration file
    pub fn global_config_path() -> ConfigResult<Utf8PathBuf> {
        let home_dir = dirs::home_dir().ok_or_else(|| invalid("home_dir", "Could not determine home directory"))?;

        let home_dir = Utf8PathBuf::try_from(home_dir)
            .map_err(|e| invalid("home_dir", format!("Invalid home directory path: {}", e)))?;

        Ok(home_dir.join(".webflow").join("config.toml"))
    }

    /// Load global configuration
    pub async fn load_global_config(&self) -> ConfigResult<Option<(WebflowToml, ConfigSource)>> {
        let path = Self::global_config_path()?;
        Self::load_optional(&path).await.map(|config| config.map(|config| (config, ConfigSource::Global(path))))
    }

    async fn load_optional(path: &Utf8Path) -> ConfigResult<Option<WebflowToml>> {
        if path.exists() {
            debug!(path = %path, "Loading global configuration");
            crate::toml::load_from_file(path).await.map(Some)
        } else {
            Ok(None)
        }
    }

    /// Load every layer and merge them with the given command-line overrides.
    ///
    /// Returns the merged settings and the files that contributed to them.
    pub async fn load(&self, cli_overrides: HashMap<String, String>) -> ConfigResult<(WebflowToml, Vec<ConfigSource>)> {
        let mut sources = Vec::new();

        let global = self.load_global_config().await?.map(|(config, source)| {
            sources.push(source);
            config
        });
        let project = self.load_project_config().await?.map(|(config, source)| {
            sources.push(source);
            config
        });

        let env_overrides = ConfigLayering::collect_env_overrides();
        sources.extend(env_overrides.keys().map(|key| ConfigSource::Environment(key.clone())));
        if !cli_overrides.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }

        let merged = ConfigLayering::merge_configs(global, project, env_overrides, cli_overrides)?;
        Ok((merged, sources))
    }
}

impl ConfigLayering {
    /// Merge multiple configuration layers.
    ///
    /// Precedence, lowest first: global file, project file, environment,
    /// command line.
    pub fn merge_configs(
        global_config: Option<WebflowToml>,
        project_config: Option<WebflowToml>,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<WebflowToml> {
        let mut merged = project_config.unwrap_or_default();

        if let Some(global) = global_config {
            Self::fill_unset(&mut merged, global);
        }

        Self::apply_env_overrides(&mut merged, &env_overrides)?;

        Self::apply_cli_overrides(&mut merged, &cli_overrides)?;

        validate_config(&merged)?;

        Ok(merged)
    }

    /// Take every setting `config` leaves unset from `base`
    fn fill_unset(config: &mut WebflowToml, base: WebflowToml) {
        let api = &mut config.api;
        api.token = api.token.take().or(base.api.token);
        api.base_url = api.base_url.take().or(base.api.base_url);

        let retry = &mut config.retry;
        retry.max_retries = retry.max_retries.or(base.retry.max_retries);
        retry.retry_delay_secs = retry.retry_delay_secs.or(base.retry.retry_delay_secs);

        let concurrency = &mut config.concurrency;
        concurrency.pool_size = concurrency.pool_size.or(base.concurrency.pool_size);
        concurrency.page_size = concurrency.page_size.or(base.concurrency.page_size);
        concurrency.max_items_per_request = concurrency
            .max_items_per_request
            .or(base.concurrency.max_items_per_request);
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: &mut WebflowToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "WEBFLOW_API_TOKEN" => config.api.token = Some(value.clone()),
                "WEBFLOW_BASE_URL" => config.api.base_url = Some(value.clone()),
                "WEBFLOW_MAX_RETRIES" => config.retry.max_retries = Some(parse_number(key, value)?),
                "WEBFLOW_RETRY_DELAY" => config.retry.retry_delay_secs = Some(parse_number(key, value)?),
                "WEBFLOW_POOL_SIZE" => config.concurrency.pool_size = Some(parse_number(key, value)?),
                "WEBFLOW_PAGE_SIZE" => config.concurrency.page_size = Some(parse_number(key, value)?),
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(config: &mut WebflowToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "token" => config.api.token = Some(value.clone()),
                "base_url" => config.api.base_url = Some(value.clone()),
                "max_retries" => config.retry.max_retries = Some(parse_number(key, value)?),
                "retry_delay" => config.retry.retry_delay_secs = Some(parse_number(key, value)?),
                "pool_size" => config.concurrency.pool_size = Some(parse_number(key, value)?),
                "page_size" => config.concurrency.page_size = Some(parse_number(key, value)?),
                _ => {
                    // Unknown CLI override, ignore
                }
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)).collect()
    }
}

fn parse_number<T>(field: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| -> WebflowError {
        invalid(field, format!("'{}' is not a valid number: {}", value, e))
    })
}
