mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract {
            url,
            unstructured,
            format,
        } => cli::extract::run_url(&config, &url, unstructured, format).await,
        Commands::Parse {
            file,
            unstructured,
            format,
        } => cli::extract::run_file(&config, &file, unstructured, format),
        Commands::Check { names } => cli::check::run(&config, &names),
    }
}
