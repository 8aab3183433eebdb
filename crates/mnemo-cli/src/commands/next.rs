//! The `mnemo next` command.

use std::path::PathBuf;

use anyhow::Result;

use mnemo_core::snapshot::load_validated_snapshot;

use super::{path_or_plan, Context};

pub fn execute(ctx: &Context, snapshot_path: PathBuf) -> Result<()> {
    let snapshot = load_validated_snapshot(&snapshot_path)?;
    let path = path_or_plan(ctx, &snapshot);

    match ctx
        .engine()
        .next_concept(&path, &snapshot.masteries, &snapshot.concepts)
    {
        Some(next) => {
            println!(
                "Next concept: {} (id {}, difficulty {}, ~{} min)",
                next.concept.name,
                next.concept.id,
                next.concept.difficulty_level,
                next.concept.estimated_minutes
            );
            println!(
                "Position {} of {} ({:.1}% through the path)",
                next.index + 1,
                path.len(),
                next.progress
            );
        }
        None => println!("Learning path completed!"),
    }

    Ok(())
}
