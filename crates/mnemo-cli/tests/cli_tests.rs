//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PYTHON: &str = "../../snapshots/python-basics.toml";
const ALGEBRA: &str = "../../snapshots/algebra.json";
const NOW: &str = "2025-03-02T00:00:00Z";

fn mnemo() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("mnemo").unwrap();
    // Keep user config and overrides out of the tests.
    cmd.env("HOME", "/nonexistent-mnemo-home")
        .env_remove("MNEMO_INTERLEAVING_RATIO")
        .env_remove("MNEMO_SESSION_SIZE");
    cmd
}

#[test]
fn help_output() {
    mnemo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("learning-path planner"));
}

#[test]
fn version_output() {
    mnemo()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mnemo"));
}

#[test]
fn validate_fixture() {
    mnemo()
        .args(["validate", "--snapshot", PYTHON])
        .assert()
        .success()
        .stdout(predicate::str::contains("user 7, 4 items, 4 concepts"))
        .stdout(predicate::str::contains("Snapshot valid."));
}

#[test]
fn validate_directory() {
    mnemo()
        .args(["validate", "--snapshot", "../../snapshots"])
        .assert()
        .success()
        .stdout(predicate::str::contains("algebra.json"))
        .stdout(predicate::str::contains("python-basics.toml"))
        .stdout(predicate::str::contains("All 2 snapshots valid."));
}

#[test]
fn validate_reports_problems() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        "user_id = 1\n\n[[concepts]]\nid = 1\nprerequisites = [42]\n",
    )
    .unwrap();

    mnemo()
        .args(["validate", "--snapshot"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[concept 1] WARNING: concept 1 requires unknown concept 42",
        ))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

const CORRUPT: &str = r#"user_id = 1

[[items]]
id = 1
topic_id = 1
easiness_factor = 0.2
interval_days = -40.0
next_review_date = "2025-01-01T00:00:00Z"

[[concepts]]
id = 1

[[concepts]]
id = 2
prerequisites = [1]

[[masteries]]
user_id = 1
concept_id = 1
mastery_score = 7.5
"#;

#[test]
fn validate_flags_out_of_range_records_as_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.toml");
    std::fs::write(&path, CORRUPT).unwrap();

    mnemo()
        .args(["validate", "--snapshot"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[item 1] ERROR: easiness factor 0.2 is below the 1.3 floor",
        ))
        .stdout(predicate::str::contains("[mastery 1] ERROR: mastery score 7.5"));
}

#[test]
fn commands_refuse_out_of_range_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.toml");
    std::fs::write(&path, CORRUPT).unwrap();

    for command in ["next", "gaps", "adapt", "suggest", "queue", "plan"] {
        mnemo()
            .args([command, "--snapshot"])
            .arg(&path)
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("invalid snapshot"))
            .stderr(predicate::str::contains("mastery score 7.5 for concept 1"));
    }

    mnemo()
        .args(["review", "--item", "1", "--quality", "4", "--snapshot"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("below the 1.3 floor"));
}

#[test]
fn validate_nonexistent_file() {
    mnemo()
        .args(["validate", "--snapshot", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created mnemo.toml"))
        .stdout(predicate::str::contains("Created snapshots/example.toml"));

    assert!(dir.path().join("mnemo.toml").exists());
    assert!(dir.path().join("snapshots/example.toml").exists());

    // The generated files are usable as they stand.
    mnemo()
        .current_dir(dir.path())
        .args(["validate", "--snapshot", "snapshots/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshot valid."));
    mnemo()
        .current_dir(dir.path())
        .args(["next", "--snapshot", "snapshots/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next concept: Control flow"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    mnemo().current_dir(dir.path()).arg("init").assert().success();

    // Second init should skip
    mnemo()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn plan_text() {
    mnemo()
        .args(["plan", "--snapshot", PYTHON])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Learning path for topic 2: 4 concepts, 2.3 hours, target depth apply",
        ))
        .stdout(predicate::str::contains("Average difficulty: 2.25"))
        .stdout(predicate::str::contains("100% Complete: Mastered Recursion"));
}

#[test]
fn plan_json_orders_easiest_first() {
    let output = mnemo()
        .args(["plan", "--snapshot", ALGEBRA, "--format", "json", "--depth", "analyze"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["concept_sequence"], serde_json::json!([2, 1, 3]));
    assert_eq!(plan["difficulty_curve"], serde_json::json!([1, 3, 1]));
    assert_eq!(plan["estimated_hours"], serde_json::json!(2.0));
    assert_eq!(plan["target_depth"], "analyze");
}

#[test]
fn plan_rejects_unknown_depth() {
    mnemo()
        .args(["plan", "--snapshot", PYTHON, "--depth", "memorize"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown understanding level"));
}

#[test]
fn next_follows_committed_path() {
    mnemo()
        .args(["next", "--snapshot", PYTHON])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next concept: Loops (id 2"))
        .stdout(predicate::str::contains("Position 2 of 4 (25.0% through the path)"));
}

#[test]
fn next_plans_when_no_path() {
    mnemo()
        .args(["next", "--snapshot", ALGEBRA])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next concept: Integers (id 2"));
}

#[test]
fn next_on_finished_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("done.toml");
    std::fs::write(
        &path,
        "user_id = 1\n\n[[concepts]]\nid = 1\n\n[path]\nuser_id = 1\nconcept_sequence = [1]\ncurrent_index = 1\n",
    )
    .unwrap();

    mnemo()
        .args(["next", "--snapshot"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Learning path completed!"));
}

#[test]
fn adapt_speeds_up_strong_learner() {
    mnemo()
        .args(["adapt", "--snapshot", PYTHON])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pace: moderate -> fast"))
        .stdout(predicate::str::contains("Increased pace due to strong performance"))
        .stdout(predicate::str::contains("Identified 1 concepts needing review"))
        .stdout(predicate::str::contains("Struggling: [3]"));
}

#[test]
fn adapt_respects_config_thresholds() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("strict.toml");
    std::fs::write(&config, "[path]\npace_up_score = 0.95\n").unwrap();

    mnemo()
        .args(["adapt", "--snapshot", PYTHON, "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pace: moderate (unchanged)"));
}

#[test]
fn missing_config_file_fails() {
    mnemo()
        .args(["adapt", "--snapshot", PYTHON, "--config", "no-such-config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn suggest_ranks_and_truncates() {
    mnemo()
        .args(["suggest", "--snapshot", PYTHON])
        .assert()
        .success()
        .stdout(predicate::str::contains("prepare for upcoming concepts, refresh memory"))
        .stdout(predicate::str::contains("solidify understanding, address misconceptions"));

    mnemo()
        .args(["suggest", "--snapshot", PYTHON, "--max", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Variables"))
        .stdout(predicate::str::contains("Functions").not());
}

#[test]
fn gaps_lists_application_gap() {
    mnemo()
        .args(["gaps", "--snapshot", PYTHON])
        .assert()
        .success()
        .stdout(predicate::str::contains("needs application"))
        .stdout(predicate::str::contains("1 gap(s) found."));
}

#[test]
fn queue_interleaves_due_and_new() {
    mnemo()
        .args(["queue", "--snapshot", PYTHON, "--now", NOW])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 item(s) in session."));
}

#[test]
fn queue_honours_session_size_override() {
    mnemo()
        .env("MNEMO_SESSION_SIZE", "1")
        .args(["queue", "--snapshot", PYTHON, "--now", NOW])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 item(s) in session."));
}

#[test]
fn review_prints_updated_item() {
    mnemo()
        .args(["review", "--snapshot", PYTHON, "--item", "1", "--quality", "5", "--now", NOW])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"repetitions\": 3"))
        .stdout(predicate::str::contains("\"times_reviewed\": 3"))
        .stdout(predicate::str::contains("2025-03-17T14:24:00Z"));
}

#[test]
fn review_failed_recall_resets() {
    mnemo()
        .args(["review", "--snapshot", PYTHON, "--item", "1", "--quality", "1", "--now", NOW])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"repetitions\": 0"))
        .stdout(predicate::str::contains("\"times_correct\": 2"))
        .stdout(predicate::str::contains("\"next_review_date\": \"2025-03-02T00:00:00Z\""));
}

#[test]
fn review_unknown_item() {
    mnemo()
        .args(["review", "--snapshot", PYTHON, "--item", "99", "--quality", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("review item 99 not found"));
}

#[test]
fn review_rejects_bad_quality() {
    mnemo()
        .args(["review", "--snapshot", PYTHON, "--item", "1", "--quality", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quality rating 7 is outside 0..=5"));
}

#[test]
fn bad_now_timestamp() {
    mnemo()
        .args(["queue", "--snapshot", PYTHON, "--now", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RFC 3339"));
}
