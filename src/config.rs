use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Data source holding the osm2po routing table
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    #[serde(default = "default_table")]
    pub table: String,
}

/// Destination of the GEXF document
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

/// Static text placed in the document's `<meta>` block
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_creator")]
    pub creator: String,
    #[serde(default = "default_description")]
    pub description: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            creator: default_creator(),
            description: default_description(),
        }
    }
}

/// How node endpoints are deduplicated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NodeStrategy {
    /// Let the database run the endpoint union
    #[default]
    Query,
    /// Fetch edges once and union endpoints in memory
    Memory,
}

/// Export tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub nodes: NodeStrategy,
    /// Replacement for a zero forward cost
    #[serde(default = "default_cost_epsilon")]
    pub cost_epsilon: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            nodes: NodeStrategy::default(),
            cost_epsilon: default_cost_epsilon(),
        }
    }
}

fn default_table() -> String {
    "basel_2po_4pgr".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("basel.gexf")
}

fn default_creator() -> String {
    "Robin Dainton, Thomas Gerzner FHNW".to_string()
}

fn default_description() -> String {
    "MSE FS16 Semesterprojekt FHNW".to_string()
}

fn default_cost_epsilon() -> f64 {
    crate::graph::COST_EPSILON
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in ROADGEXF_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = std::env::var("ROADGEXF_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            anyhow::bail!("database.path must not be empty");
        }

        // The table name is spliced into SQL text
        if !is_plain_identifier(&self.database.table) {
            anyhow::bail!(
                "database.table must be a plain identifier (letters, digits, underscore): {:?}",
                self.database.table
            );
        }

        if self.output.path.as_os_str().is_empty() {
            anyhow::bail!("output.path must not be empty");
        }

        if !self.export.cost_epsilon.is_finite() || self.export.cost_epsilon <= 0.0 {
            anyhow::bail!(
                "export.cost_epsilon must be a positive finite number, got {}",
                self.export.cost_epsilon
            );
        }

        Ok(())
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.database.path
    }

    /// Get output path
    pub fn output_path(&self) -> &Path {
        &self.output.path
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
