//! The `mnemo gaps` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mnemo_core::adapter::{GapKind, Severity};
use mnemo_core::snapshot::load_validated_snapshot;

use super::Context;

pub fn execute(ctx: &Context, snapshot_path: PathBuf) -> Result<()> {
    let snapshot = load_validated_snapshot(&snapshot_path)?;
    let gaps = ctx.engine().identify_knowledge_gaps(
        snapshot.user_id,
        &snapshot.masteries,
        &snapshot.concepts,
    );

    if gaps.is_empty() {
        println!("No knowledge gaps found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Concept",
        "Gap",
        "Severity",
        "Weak prerequisites",
        "Recommendation",
    ]);
    for gap in &gaps {
        let kind = match gap.kind {
            GapKind::WeakFoundation => "weak foundation",
            GapKind::NeedsApplication => "needs application",
        };
        let severity = match gap.severity {
            Severity::High => "high",
            Severity::Medium => "medium",
        };
        let weak = gap
            .weak_prerequisites
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(gap.concept_id),
            Cell::new(kind),
            Cell::new(severity),
            Cell::new(weak),
            Cell::new(&gap.recommendation),
        ]);
    }

    println!("{table}");
    println!("{} gap(s) found.", gaps.len());
    Ok(())
}
