use anyhow::{Context, Result};
use directories::ProjectDirs;
use gitpilot_core::analyzer::{DEFAULT_REMOTE, ReportOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cli::{CliArgs, Command};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub remotes: RemotesConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct RemotesConfig {
    /// Remote consulted first when a branch exists on several
    pub preferred: String,
    /// Remotes fetched before a sweep; empty means every configured remote
    pub fetch: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub history_limit: usize,
    pub show_diff: bool,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            remotes: RemotesConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for RemotesConfig {
    fn default() -> Self {
        Self {
            preferred: DEFAULT_REMOTE.to_string(),
            fetch: Vec::new(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            history_limit: 20,
            show_diff: true,
            color: true,
        }
    }
}

pub fn get_default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "gitpilot")
        .context("Failed to determine project directories")?;

    let config_dir = proj_dirs.config_dir();
    Ok(config_dir.join("gitpilot.toml"))
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p,
            None => get_default_config_path()?,
        };

        if !path.exists() {
            let default_config = Config::default();
            // Create directory if it doesn't exist
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
            default_config.save(&path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&path, contents).with_context(|| {
            format!("Failed to write config file: {}", path.as_ref().display())
        })?;

        Ok(())
    }

    pub fn from_cli_and_file(cli_args: &CliArgs) -> Result<Self> {
        let mut config = Self::load(cli_args.config.clone())?;

        // CLI args override config file
        if cli_args.no_color {
            config.report.color = false;
        }
        if let Some(Command::BranchStatus { limit, no_diff, .. }) = &cli_args.command {
            if let Some(limit) = limit {
                config.report.history_limit = *limit;
            }
            if *no_diff {
                config.report.show_diff = false;
            }
        }

        Ok(config)
    }

    pub fn report_options(&self, probe: bool) -> ReportOptions {
        ReportOptions {
            history_limit: self.report.history_limit,
            include_diff: self.report.show_diff,
            probe,
        }
    }
}
