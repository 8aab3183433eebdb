//! The `mnemo adapt` command.

use std::path::PathBuf;

use anyhow::Result;

use mnemo_core::snapshot::load_validated_snapshot;

use super::{path_or_plan, Context};

pub fn execute(ctx: &Context, snapshot_path: PathBuf, format: String) -> Result<()> {
    let snapshot = load_validated_snapshot(&snapshot_path)?;
    let path = path_or_plan(ctx, &snapshot);

    let report = ctx
        .engine()
        .adapt_path(&path, &snapshot.performance, &snapshot.masteries);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Average recent score: {:.1}% over {} sample(s)",
                report.average_score * 100.0,
                snapshot.performance.len()
            );
            match report.pace_change {
                Some(pace) => println!("Pace: {} -> {pace}", path.pace),
                None => println!("Pace: {} (unchanged)", path.pace),
            }

            if report.adjustments_made.is_empty() {
                println!("No adjustments needed.");
            } else {
                println!("\nAdjustments:");
                for note in &report.adjustments_made {
                    println!("  - {note}");
                }
            }

            if !report.struggling_concepts.is_empty() {
                println!("Struggling: {:?}", report.struggling_concepts);
            }
            if !report.concepts_skipped.is_empty() {
                println!("Skippable: {:?}", report.concepts_skipped);
            }
        }
    }

    Ok(())
}
