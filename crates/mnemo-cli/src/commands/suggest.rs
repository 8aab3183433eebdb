//! The `mnemo suggest` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mnemo_core::navigator::upcoming_prerequisites;
use mnemo_core::snapshot::load_validated_snapshot;

use super::{path_or_plan, Context};

pub fn execute(ctx: &Context, snapshot_path: PathBuf, max: Option<usize>) -> Result<()> {
    let snapshot = load_validated_snapshot(&snapshot_path)?;
    let path = path_or_plan(ctx, &snapshot);
    let upcoming = upcoming_prerequisites(&path, &snapshot.concepts);
    let max = max.unwrap_or(ctx.config.path.max_review_suggestions);

    let suggestions = ctx.engine().suggest_review_concepts(
        snapshot.user_id,
        &snapshot.masteries,
        &upcoming,
        max,
    );

    if suggestions.is_empty() {
        println!("No review suggestions.");
        return Ok(());
    }

    let names: HashMap<u64, &str> = snapshot
        .concepts
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut table = Table::new();
    table.set_header(vec!["Concept", "Name", "Priority", "Reason"]);
    for s in &suggestions {
        table.add_row(vec![
            Cell::new(s.concept_id),
            Cell::new(names.get(&s.concept_id).copied().unwrap_or("")),
            Cell::new(s.priority_score),
            Cell::new(&s.reason),
        ]);
    }

    println!("{table}");
    Ok(())
}
