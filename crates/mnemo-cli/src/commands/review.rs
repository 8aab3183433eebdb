//! The `mnemo review` command.

use std::path::PathBuf;

use anyhow::Result;

use mnemo_core::model::Quality;
use mnemo_core::scheduler::record_answer;
use mnemo_core::snapshot::load_validated_snapshot;

use super::Context;

pub fn execute(
    ctx: &Context,
    snapshot_path: PathBuf,
    item_id: u64,
    quality: u8,
    incorrect: bool,
) -> Result<()> {
    let snapshot = load_validated_snapshot(&snapshot_path)?;
    let quality = Quality::new(quality)?;
    let item = snapshot.find_item(item_id)?;

    // A passing grade counts as correct unless the caller says otherwise.
    let is_correct = quality.is_pass() && !incorrect;
    let updated = record_answer(item, quality, is_correct, ctx.now);

    tracing::info!(
        item_id,
        quality = quality.value(),
        interval_days = updated.interval_days,
        next_review = %updated.next_review_date,
        "recorded answer"
    );

    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}
