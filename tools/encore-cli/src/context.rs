//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use encore_data::Transport;
use storefront_api::{variable, StoreConfig};

use crate::output::Output;
use crate::transport::ReqwestTransport;

/// Config file names searched from the working directory upwards.
const CONFIG_NAMES: [&str; 2] = ["encore.toml", ".encore.toml"];

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Environment => f.write_str("environment variables"),
        }
    }
}

/// Execution context for CLI commands.
pub struct Context {
    /// Store configuration.
    pub config: StoreConfig,
    /// Where `config` was loaded from.
    pub source: ConfigSource,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from a config file, a discovered `encore.toml`, or the
    /// environment.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => find_config(&cwd),
        };

        let (config, source) = match path {
            Some(path) => (load_file(&path)?, ConfigSource::File(path)),
            None => (
                StoreConfig::from_lookup(variable),
                ConfigSource::Environment,
            ),
        };
        output.debug(&format!("Configuration from {}", source));

        Ok(Self {
            config,
            source,
            output,
            cwd,
        })
    }

    /// Network transport for provider clients.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(ReqwestTransport::new())
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

fn load_file(path: &Path) -> Result<StoreConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    StoreConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
}

/// Find a config file in the directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}
