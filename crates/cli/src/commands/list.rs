//! `amalgam list` — Show the resolved file table.

use amalgam_config::AmalgamConfig;
use std::path::Path;

pub fn run(config_path: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AmalgamConfig::load(config_path)?;
    let plan = config.plan();

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Markers: {:?} … {:?}", plan.markers.begin, plan.markers.end);
    for output in &plan.outputs {
        println!();
        println!("{} → {}", output.name, output.path.display());
        for (i, source) in plan.sources_for(&output.name).enumerate() {
            println!("  {:>2}. {:<28} {}", i + 1, source.name, source.path.display());
        }
    }

    Ok(())
}
