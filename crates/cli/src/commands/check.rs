//! `amalgam check` — Diagnose inputs and markers.
//!
//! Marker anomalies are reported but never change what `generate` produces.

use amalgam_config::AmalgamConfig;
use amalgam_core::{scan_markers, MarkerScan, TextFile};
use std::path::Path;

/// Warnings for one file's marker layout.
fn marker_warnings(scan: &MarkerScan) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if !scan.has_begin() {
        warnings.push("no begin marker, keeping from the first line");
    }
    if !scan.has_end() {
        warnings.push("no end marker, keeping through the last line");
    }
    if scan.has_duplicates() {
        warnings.push("marker appears on several lines (first begin / last end win)");
    }
    if scan.is_out_of_order() {
        warnings.push("begin marker is not before end marker, window is empty");
    }
    warnings
}

pub fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 amalgam check");
    println!("================\n");

    let config = AmalgamConfig::load(config_path)?;
    println!("  ✅ Config valid");

    let plan = config.plan();
    let mut missing = 0;
    let mut warned = 0;

    for output in &plan.outputs {
        println!("\n  {} → {}", output.name, output.path.display());

        for source in plan.sources_for(&output.name) {
            let file = match TextFile::read(source.name.clone(), &source.path) {
                Ok(file) => file,
                Err(e) => {
                    println!("  ❌ {e}");
                    missing += 1;
                    continue;
                }
            };

            let scan = scan_markers(file.lines(), &plan.markers);
            let warnings = marker_warnings(&scan);
            if warnings.is_empty() {
                println!(
                    "  ✅ {} ({} of {} lines kept)",
                    source.name,
                    scan.kept_lines(),
                    file.lines().len()
                );
            } else {
                warned += 1;
                for w in &warnings {
                    println!("  ⚠️  {}: {w}", source.name);
                }
            }
        }
    }

    println!();
    if missing > 0 {
        return Err(format!("{missing} source(s) cannot be read").into());
    }
    if warned == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {warned} file(s) with marker warnings. See above for details.");
    }

    Ok(())
}
