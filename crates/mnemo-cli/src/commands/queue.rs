//! The `mnemo queue` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mnemo_core::session::SessionPlanner;
use mnemo_core::snapshot::load_validated_snapshot;

use super::Context;

pub fn execute(ctx: &Context, snapshot_path: PathBuf) -> Result<()> {
    let snapshot = load_validated_snapshot(&snapshot_path)?;
    let planner = SessionPlanner::new(ctx.config.scheduler.clone());
    let session = planner.select_items(&snapshot.items, ctx.now);

    if session.is_empty() {
        println!("Nothing to review.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Item",
        "Topic",
        "Status",
        "Difficulty",
        "Easiness",
        "Interval",
        "Accuracy",
    ]);

    for item in &session {
        let status = if item.is_new() { "new" } else { "due" };
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(item.topic_id),
            Cell::new(status),
            Cell::new(item.difficulty),
            Cell::new(format!("{:.2}", item.easiness_factor)),
            Cell::new(format!("{:.1}d", item.interval_days)),
            Cell::new(format!("{:.0}%", item.accuracy() * 100.0)),
        ]);
    }

    println!("{table}");
    println!("{} item(s) in session.", session.len());
    Ok(())
}
