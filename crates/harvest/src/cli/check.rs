use anyhow::Result;
use console::style;
use harvest_core::{HarvestConfig, HarvestPipeline};

pub fn run(config: &HarvestConfig, names: &[String]) -> Result<()> {
    let pipeline = HarvestPipeline::from_config(config)?;
    let validator = pipeline.validator();

    for name in names {
        if validator.is_valid(name, None) {
            println!("{} accept  {name}", style("✓").green());
        } else {
            println!("{} reject  {name}", style("✗").red());
        }
    }

    Ok(())
}
