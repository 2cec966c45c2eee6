pub mod check;
pub mod extract;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use harvest_core::HarvestConfig;

#[derive(Parser)]
#[command(
    name = "harvest",
    about = "Extract deduplicated product names from furniture catalog pages",
    version
)]
pub struct Cli {
    /// JSON config file (defaults apply to anything it omits)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a page and extract its products
    Extract {
        /// Page URL
        url: String,
        /// Also scan title-like elements when structured markup is missing
        #[arg(short, long)]
        unstructured: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Extract products from a saved HTML file
    Parse {
        /// HTML file path
        file: PathBuf,
        /// Also scan title-like elements when structured markup is missing
        #[arg(short, long)]
        unstructured: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Report whether each name passes product validation
    Check {
        /// Candidate names
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON records
    Json,
    /// One product name per line
    Names,
}

pub fn load_config(path: Option<&Path>) -> Result<HarvestConfig> {
    let config = match path {
        Some(path) => HarvestConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?
            .with_env_overrides()?,
        None => HarvestConfig::from_env()?,
    };
    Ok(config)
}
