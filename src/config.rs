use std::path::Path;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::task::{DEFAULT_LABEL_WIDTH, LineFormat};

pub const DEFAULT_CONFIG_FILE: &str = ".pomo.toml";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub token_env: Option<String>,
    pub per_page: Option<u32>,
    pub label_width: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub token_env: String,
    pub per_page: u32,
    pub label_width: usize,
}

impl Config {
    /// Load the config file named by `--config`, or `.pomo.toml` if it
    /// exists, and apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = match cli.config.as_deref() {
            Some(path) => {
                let config_path = Path::new(path);
                if !config_path.exists() {
                    return Err(Error::ConfigNotFound(config_path.to_path_buf()));
                }
                parse_config(&std::fs::read_to_string(config_path)?)?
            }
            None => {
                let config_path = Path::new(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    parse_config(&std::fs::read_to_string(config_path)?)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let config = merge(file_config, cli);
        validate_api_url(&config.api_url)?;
        Ok(config)
    }

    pub fn line_format(&self) -> LineFormat {
        LineFormat::new(self.label_width)
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ConfigFile) -> Result<()> {
    if let Some(ref api_url) = config.api_url {
        validate_api_url(api_url)?;
    }
    if let Some(ref token_env) = config.token_env
        && token_env.trim().is_empty()
    {
        return Err(Error::ConfigValidation(
            "token_env must not be empty".to_string(),
        ));
    }
    if let Some(per_page) = config.per_page
        && !(1..=100).contains(&per_page)
    {
        return Err(Error::ConfigValidation(format!(
            "per_page must be between 1 and 100 (got {per_page})"
        )));
    }
    if let Some(width) = config.label_width
        && width == 0
    {
        return Err(Error::ConfigValidation(
            "label_width must be > 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_api_url(api_url: &str) -> Result<()> {
    if api_url.starts_with("https://") || api_url.starts_with("http://") {
        Ok(())
    } else {
        Err(Error::ConfigValidation(format!(
            "api_url must be an http(s) URL (got {api_url})"
        )))
    }
}

pub fn merge(file: ConfigFile, cli: &Cli) -> Config {
    Config {
        api_url: cli
            .api_url
            .clone()
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        token_env: file
            .token_env
            .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string()),
        per_page: file.per_page.unwrap_or(DEFAULT_PER_PAGE),
        label_width: file.label_width.unwrap_or(DEFAULT_LABEL_WIDTH),
    }
}
