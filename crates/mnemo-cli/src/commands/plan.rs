//! The `mnemo plan` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mnemo_core::model::BloomLevel;
use mnemo_core::snapshot::load_validated_snapshot;

use super::Context;

pub fn execute(ctx: &Context, snapshot_path: PathBuf, depth: String, format: String) -> Result<()> {
    let snapshot = load_validated_snapshot(&snapshot_path)?;
    let depth: BloomLevel = depth.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let plan = ctx.engine().create_learning_path(
        snapshot.topic_id,
        &snapshot.concepts,
        &snapshot.profile(),
        depth,
    );

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        _ => {
            println!(
                "Learning path for topic {}: {} concepts, {:.1} hours, target depth {}",
                plan.topic_id, plan.total_concepts, plan.estimated_hours, plan.target_depth
            );

            let names: HashMap<u64, &str> = snapshot
                .concepts
                .iter()
                .map(|c| (c.id, c.name.as_str()))
                .collect();

            let mut table = Table::new();
            table.set_header(vec!["#", "Concept", "Name", "Difficulty"]);
            for (i, (id, difficulty)) in plan
                .concept_sequence
                .iter()
                .zip(&plan.difficulty_curve)
                .enumerate()
            {
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new(id),
                    Cell::new(names.get(id).copied().unwrap_or("")),
                    Cell::new(difficulty),
                ]);
            }
            println!("{table}");
            println!("Average difficulty: {:.2}", plan.average_difficulty);

            if !plan.milestones.is_empty() {
                println!("\nMilestones:");
                for m in &plan.milestones {
                    println!("  {}: {} (concept {})", m.name, m.description, m.concept_id);
                }
            }

            if !plan.unresolved.is_empty() {
                println!(
                    "\nWARNING: {} concept(s) could not be ordered: {:?}",
                    plan.unresolved.len(),
                    plan.unresolved
                );
            }
        }
    }

    Ok(())
}
