use crate::adapters::github::{DEFAULT_API_URL, MAX_PER_PAGE};
use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::pipeline::{DEFAULT_WORKERS, PipelineOptions};
use crate::ports::SearchQuery;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API access token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Config {
    pub version: u32,
    /// Directory that receives one folder per repository
    pub work_dir: PathBuf,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub api_url: String,
    pub topics: Vec<String>,
    pub min_stars: u32,
    pub per_page: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    pub workers: usize,
    pub shuffle: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            work_dir: PathBuf::from("."),
            search: SearchConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            topics: vec!["security".to_string(), "cybersecurity".to_string()],
            min_stars: 50,
            per_page: MAX_PER_PAGE,
            timeout_secs: 30,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            shuffle: true,
        }
    }
}

pub fn get_default_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("", "", "topicharvest").ok_or(ConfigError::NoProjectDirs)?;

    let config_dir = proj_dirs.config_dir();
    Ok(config_dir.join("topicharvest.toml"))
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(p) => p,
            None => get_default_config_path()?,
        };

        if !path.exists() {
            let default_config = Config::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            default_config.save(&path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        fs::write(&path, contents).map_err(|source| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    pub fn from_cli_and_file(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::load(cli_args.config.clone())?;
        config.apply_cli(cli_args);
        Ok(config)
    }

    /// CLI args override config file values
    pub fn apply_cli(&mut self, cli_args: &CliArgs) {
        if let Some(work_dir) = &cli_args.work_dir {
            self.work_dir = work_dir.clone();
        }
        if let Some(workers) = cli_args.workers {
            self.pipeline.workers = workers;
        }
        if cli_args.no_shuffle {
            self.pipeline.shuffle = false;
        }
        if let Some(min_stars) = cli_args.min_stars {
            self.search.min_stars = min_stars;
        }
        if !cli_args.topics.is_empty() {
            self.search.topics = cli_args.topics.clone();
        }
    }

    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.search.topics.clone(), self.search.min_stars)
    }

    pub fn pipeline_options(&self, limit: Option<usize>) -> PipelineOptions {
        PipelineOptions {
            limit,
            shuffle: self.pipeline.shuffle,
            workers: self.pipeline.workers.max(1),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_secs)
    }
}

/// Read the access token. It is never stored in the config file.
pub fn token_from_env() -> Result<String, ConfigError> {
    token_from(std::env::var(TOKEN_ENV).ok())
}

fn token_from(value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ConfigError::MissingToken),
    }
}
