//! Learner snapshot files.
//!
//! A snapshot bundles everything the engine needs for one learner: review
//! items, the concept catalog, mastery records, an optional committed path,
//! and recent performance samples. Snapshots are read from TOML or JSON and
//! checked for the contract the engine relies on.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::graph::topological_order;
use crate::model::{
    Concept, ConceptId, ConceptMastery, ItemId, LearnerProfile, LearningPath, PerformanceSample,
    ReviewItem, TopicId, UserId,
};

/// Everything known about one learner at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub user_id: UserId,
    /// Topic the concept catalog belongs to.
    #[serde(default)]
    pub topic_id: TopicId,
    #[serde(default)]
    pub profile: Option<LearnerProfile>,
    #[serde(default)]
    pub items: Vec<ReviewItem>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub masteries: Vec<ConceptMastery>,
    #[serde(default)]
    pub path: Option<LearningPath>,
    #[serde(default)]
    pub performance: Vec<PerformanceSample>,
}

impl Snapshot {
    /// The stored profile, or a blank one for `user_id`.
    pub fn profile(&self) -> LearnerProfile {
        self.profile
            .clone()
            .unwrap_or_else(|| LearnerProfile::new(self.user_id))
    }

    pub fn find_item(&self, id: ItemId) -> Result<&ReviewItem, CoreError> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or(CoreError::UnknownItem(id))
    }
}

/// Read and parse one snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file: {}", path.display()))?;

    parse_snapshot_str(&content, path)
}

/// Parse snapshot text. `.json` sources are read as JSON, anything else as
/// TOML.
pub fn parse_snapshot_str(content: &str, source_path: &Path) -> Result<Snapshot> {
    let is_json = source_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))
    } else {
        toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))
    }
}

/// Read a snapshot and refuse it if any record breaks a field contract.
///
/// Structural problems (cycles, unknown prerequisites, foreign records) are
/// logged and let through, since ordering and navigation tolerate them.
pub fn load_validated_snapshot(path: &Path) -> Result<Snapshot> {
    let snapshot = load_snapshot(path)?;

    let (errors, warnings): (Vec<_>, Vec<_>) = validate_snapshot(&snapshot)
        .into_iter()
        .partition(|w| w.is_error);

    for w in &warnings {
        tracing::warn!("{}: {w}", path.display());
    }

    if !errors.is_empty() {
        let listed: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!(
            "invalid snapshot {}: {}",
            path.display(),
            listed.join("; ")
        );
    }

    Ok(snapshot)
}

/// Recursively load every `.toml` and `.json` snapshot under `dir`.
///
/// Files that fail to parse are logged and skipped.
pub fn load_snapshot_directory(dir: &Path) -> Result<Vec<(PathBuf, Snapshot)>> {
    let mut snapshots = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            snapshots.extend(load_snapshot_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match load_snapshot(&path) {
                Ok(snapshot) => snapshots.push((path, snapshot)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(snapshots)
}

/// A problem found in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The record concerned, e.g. `concept 4` (if applicable).
    pub record: Option<String>,
    /// Warning message.
    pub message: String,
    /// The record holds a value the engine cannot compute with.
    pub is_error: bool,
}

impl ValidationWarning {
    fn new(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
            message: message.into(),
            is_error: false,
        }
    }

    fn from_error(record: impl Into<String>, error: &CoreError) -> Self {
        Self {
            record: Some(record.into()),
            message: error.to_string(),
            is_error: !error.is_structural(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record {
            Some(record) => write!(f, "[{record}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Check a snapshot for records that break the engine's assumptions.
pub fn validate_snapshot(snapshot: &Snapshot) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_items = HashSet::new();
    for item in &snapshot.items {
        let record = format!("item {}", item.id);
        if !seen_items.insert(item.id) {
            warnings.push(ValidationWarning::from_error(
                &record,
                &CoreError::DuplicateItem(item.id),
            ));
        }
        if let Err(e) = item.validate() {
            warnings.push(ValidationWarning::from_error(&record, &e));
        }
    }

    let known: HashSet<ConceptId> = snapshot.concepts.iter().map(|c| c.id).collect();
    let mut seen_concepts = HashSet::new();
    for concept in &snapshot.concepts {
        let record = format!("concept {}", concept.id);
        if !seen_concepts.insert(concept.id) {
            warnings.push(ValidationWarning::from_error(
                &record,
                &CoreError::DuplicateConcept(concept.id),
            ));
        }
        if let Err(e) = concept.validate() {
            warnings.push(ValidationWarning::from_error(&record, &e));
        }
        for &prerequisite_id in &concept.prerequisites {
            if !known.contains(&prerequisite_id) {
                let e = CoreError::UnknownPrerequisite {
                    concept_id: concept.id,
                    prerequisite_id,
                };
                warnings.push(ValidationWarning::from_error(&record, &e));
            }
        }
    }

    // Concepts held back only by a missing prerequisite are already reported.
    let ordering = topological_order(&snapshot.concepts);
    for id in ordering.unresolved {
        let blocked_by_unknown = snapshot
            .concepts
            .iter()
            .filter(|c| c.id == id)
            .any(|c| c.prerequisites.iter().any(|p| !known.contains(p)));
        if !blocked_by_unknown {
            warnings.push(ValidationWarning::new(
                format!("concept {id}"),
                "sits on or behind a prerequisite cycle",
            ));
        }
    }

    for mastery in &snapshot.masteries {
        let record = format!("mastery {}", mastery.concept_id);
        if let Err(e) = mastery.validate() {
            warnings.push(ValidationWarning::from_error(&record, &e));
        }
        if mastery.user_id != snapshot.user_id {
            warnings.push(ValidationWarning::new(
                &record,
                format!(
                    "belongs to user {} not {}; it will be ignored",
                    mastery.user_id, snapshot.user_id
                ),
            ));
        }
    }

    if let Some(path) = &snapshot.path {
        for id in &path.concept_sequence {
            if !known.contains(id) {
                warnings.push(ValidationWarning::new(
                    "path",
                    format!("concept {id} is not in the catalog"),
                ));
            }
        }
        if path.current_index > path.len() {
            warnings.push(ValidationWarning::new(
                "path",
                format!(
                    "current_index {} is past the end of a {}-concept path",
                    path.current_index,
                    path.len()
                ),
            ));
        }
        if path.user_id != snapshot.user_id {
            warnings.push(ValidationWarning::new(
                "path",
                format!("belongs to user {} not {}", path.user_id, snapshot.user_id),
            ));
        }
    }

    for (i, sample) in snapshot.performance.iter().enumerate() {
        if !(0.0..=1.0).contains(&sample.score) {
            warnings.push(ValidationWarning::from_error(
                format!("performance {i}"),
                &CoreError::ScoreOutOfRange(sample.score),
            ));
        }
    }

    warnings
}
