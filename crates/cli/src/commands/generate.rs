//! `amalgam generate` — Write the amalgamated outputs.

use amalgam_config::AmalgamConfig;
use amalgam_core::Amalgamator;
use std::path::Path;

pub fn run(
    config_path: Option<&Path>,
    groups: &[String],
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AmalgamConfig::load(config_path)?;
    tracing::debug!(?groups, dry_run, "Generating outputs");
    let amalgamator = Amalgamator::with_banner(config.plan(), config.banner());

    if dry_run {
        let rendered = amalgamator.render(groups)?;
        for output in &rendered {
            let bytes = output.text(&amalgamator.plan().newline).len();
            println!(
                "  {} → {} ({} sources, {} lines, {bytes} bytes)",
                output.name,
                output.path.display(),
                output.sources.len(),
                output.lines.len(),
            );
        }
        println!();
        println!("  🏷️  DRY RUN — no files written.");
        return Ok(());
    }

    let written = amalgamator.run(groups)?;
    for output in &written {
        println!(
            "  ✅ {} → {} ({} sources, {} lines, {} bytes)",
            output.name,
            output.path.display(),
            output.sources,
            output.lines,
            output.bytes,
        );
    }

    Ok(())
}
