use std::path::Path;

use anyhow::{bail, Context, Result};
use console::style;
use harvest_core::{HarvestConfig, HarvestOutcome, HarvestPipeline, ProductCandidate};

use super::OutputFormat;

pub async fn run_url(
    config: &HarvestConfig,
    url: &str,
    unstructured: bool,
    format: OutputFormat,
) -> Result<()> {
    let pipeline = HarvestPipeline::from_config(config)?;

    match pipeline.process(url, unstructured).await {
        HarvestOutcome::Products { products } => print_products(&products, format),
        HarvestOutcome::Unavailable { url, reason } => {
            bail!("failed to fetch {url}: {reason}")
        }
    }
}

pub fn run_file(
    config: &HarvestConfig,
    file: &Path,
    unstructured: bool,
    format: OutputFormat,
) -> Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let pipeline = HarvestPipeline::from_config(config)?;

    let products = pipeline.process_html(&html, unstructured);
    print_products(&products, format)
}

fn print_products(products: &[ProductCandidate], format: OutputFormat) -> Result<()> {
    if products.is_empty() {
        eprintln!("{} No products found", style("○").dim());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(products)?),
        OutputFormat::Names => {
            for product in products {
                println!("{}", product.name);
            }
        }
    }

    Ok(())
}
