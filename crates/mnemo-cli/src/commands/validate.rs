//! The `mnemo validate` command.

use std::path::PathBuf;

use anyhow::Result;

use mnemo_core::snapshot::{load_snapshot, load_snapshot_directory, validate_snapshot};

pub fn execute(snapshot_path: PathBuf) -> Result<()> {
    let snapshots = if snapshot_path.is_dir() {
        load_snapshot_directory(&snapshot_path)?
    } else {
        vec![(snapshot_path.clone(), load_snapshot(&snapshot_path)?)]
    };

    let mut total_warnings = 0;

    for (path, snapshot) in &snapshots {
        println!(
            "Snapshot: {} (user {}, {} items, {} concepts)",
            path.display(),
            snapshot.user_id,
            snapshot.items.len(),
            snapshot.concepts.len()
        );

        let warnings = validate_snapshot(snapshot);
        for w in &warnings {
            let prefix = w
                .record
                .as_ref()
                .map(|r| format!("  [{r}]"))
                .unwrap_or_else(|| "  ".to_string());
            let level = if w.is_error { "ERROR" } else { "WARNING" };
            println!("{prefix} {level}: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        if snapshots.len() == 1 {
            println!("Snapshot valid.");
        } else {
            println!("All {} snapshots valid.", snapshots.len());
        }
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
