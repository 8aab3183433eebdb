//! The `mnemo init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create mnemo.toml
    if std::path::Path::new("mnemo.toml").exists() {
        println!("mnemo.toml already exists, skipping.");
    } else {
        std::fs::write("mnemo.toml", SAMPLE_CONFIG)?;
        println!("Created mnemo.toml");
    }

    // Create example snapshot
    std::fs::create_dir_all("snapshots")?;
    let example_path = std::path::Path::new("snapshots/example.toml");
    if example_path.exists() {
        println!("snapshots/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SNAPSHOT)?;
        println!("Created snapshots/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: mnemo validate --snapshot snapshots/example.toml");
    println!("  2. Run: mnemo plan --snapshot snapshots/example.toml");
    println!("  3. Run: mnemo queue --snapshot snapshots/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mnemo configuration

[scheduler]
interleaving_ratio = 0.3
session_size = 10
min_new_items = 3

[path]
prerequisite_threshold = 0.7
mastered_threshold = 0.8
pace_up_score = 0.9
pace_down_score = 0.6
struggling_below = 0.5
skip_above = 0.9
weak_foundation_concept = 0.7
weak_foundation_prerequisite = 0.6
review_band_low = 0.6
review_band_high = 0.85
stale_after_days = 7
max_review_suggestions = 5
"#;

const EXAMPLE_SNAPSHOT: &str = r#"# An example learner snapshot.
user_id = 1
topic_id = 1

[profile]
user_id = 1
avg_accuracy = 0.72
learning_style = "balanced"

[[items]]
id = 1
topic_id = 1
easiness_factor = 2.36
repetitions = 2
interval_days = 6.0
times_reviewed = 3
times_correct = 3
next_review_date = "2025-01-01T09:00:00Z"

[[items]]
id = 2
topic_id = 2
next_review_date = "2025-01-01T09:00:00Z"

[[concepts]]
id = 1
name = "Variables"
difficulty_level = 1
estimated_minutes = 20

[[concepts]]
id = 2
name = "Control flow"
prerequisites = [1]
difficulty_level = 2
estimated_minutes = 40

[[concepts]]
id = 3
name = "Functions"
prerequisites = [1]
difficulty_level = 2
estimated_minutes = 45

[[concepts]]
id = 4
name = "Recursion"
prerequisites = [2, 3]
difficulty_level = 4
estimated_minutes = 60

[[masteries]]
user_id = 1
concept_id = 1
mastery_score = 0.85
current_level = "apply"
times_practiced = 4
days_since_practice = 9

[[masteries]]
user_id = 1
concept_id = 2
mastery_score = 0.65
current_level = "understand"
times_practiced = 2

[[performance]]
concept_id = 2
score = 0.7
"#;
