//! Core data model types for mnemo.
//!
//! These are snapshots of entities owned by the caller's persistence layer.
//! The engine reads them and returns new values or decisions; it never
//! stores them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub type ItemId = u64;
pub type TopicId = u64;
pub type ConceptId = u64;
pub type UserId = u64;

/// Lowest easiness factor SM-2 allows.
pub const MIN_EASINESS: f64 = 1.3;

/// Easiness factor given to a fresh item.
pub const DEFAULT_EASINESS: f64 = 2.5;

// ---------------------------------------------------------------------------
// Review items
// ---------------------------------------------------------------------------

/// A recall quality rating on the SM-2 0..=5 scale.
///
/// 0 is a complete blackout, 3 is a correct but difficult recall, 5 is
/// perfect. Anything below 3 counts as a failed recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if value > Self::MAX {
            return Err(CoreError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this rating counts as a successful recall.
    pub fn is_pass(self) -> bool {
        self.0 >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Difficulty tier of a review item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyTier {
    /// One tier up, capped at `Hard`.
    pub fn harder(self) -> Self {
        match self {
            DifficultyTier::Easy => DifficultyTier::Medium,
            DifficultyTier::Medium | DifficultyTier::Hard => DifficultyTier::Hard,
        }
    }

    /// One tier down, floored at `Easy`.
    pub fn easier(self) -> Self {
        match self {
            DifficultyTier::Hard => DifficultyTier::Medium,
            DifficultyTier::Medium | DifficultyTier::Easy => DifficultyTier::Easy,
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyTier::Easy => write!(f, "easy"),
            DifficultyTier::Medium => write!(f, "medium"),
            DifficultyTier::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for DifficultyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(DifficultyTier::Easy),
            "medium" => Ok(DifficultyTier::Medium),
            "hard" => Ok(DifficultyTier::Hard),
            other => Err(format!("unknown difficulty tier: {other}")),
        }
    }
}

/// A question or flashcard with its SM-2 scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// Unique identifier for this item.
    pub id: ItemId,
    /// Grouping key used for interleaving.
    pub topic_id: TopicId,
    /// SM-2 easiness factor, never below 1.3.
    #[serde(default = "default_easiness")]
    pub easiness_factor: f64,
    /// Consecutive successful recalls since the last failure.
    #[serde(default)]
    pub repetitions: u32,
    /// Current interval in (possibly fractional) days.
    #[serde(default)]
    pub interval_days: f64,
    /// When the item is next due.
    pub next_review_date: DateTime<Utc>,
    /// Total number of recorded answers.
    #[serde(default)]
    pub times_reviewed: u32,
    /// Number of recorded answers that were correct.
    #[serde(default)]
    pub times_correct: u32,
    /// Current difficulty tier.
    #[serde(default)]
    pub difficulty: DifficultyTier,
    /// When the item was last answered.
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
}

fn default_easiness() -> f64 {
    DEFAULT_EASINESS
}

impl ReviewItem {
    /// A fresh, never-reviewed item that is due immediately.
    pub fn new(id: ItemId, topic_id: TopicId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            topic_id,
            easiness_factor: DEFAULT_EASINESS,
            repetitions: 0,
            interval_days: 0.0,
            next_review_date: now,
            times_reviewed: 0,
            times_correct: 0,
            difficulty: DifficultyTier::default(),
            last_reviewed: None,
        }
    }

    /// Running accuracy; zero reviews count as one to avoid dividing by zero.
    pub fn accuracy(&self) -> f64 {
        self.times_correct as f64 / self.times_reviewed.max(1) as f64
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }

    /// "New" means never reviewed, regardless of creation date.
    pub fn is_new(&self) -> bool {
        self.times_reviewed == 0
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.easiness_factor.is_nan() || self.easiness_factor < MIN_EASINESS {
            return Err(CoreError::EasinessBelowFloor(self.easiness_factor));
        }
        if !(self.interval_days.is_finite() && self.interval_days >= 0.0) {
            return Err(CoreError::InvalidInterval(self.interval_days));
        }
        if self.times_correct > self.times_reviewed {
            return Err(CoreError::CorrectExceedsReviewed {
                correct: self.times_correct,
                reviewed: self.times_reviewed,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Concepts and mastery
// ---------------------------------------------------------------------------

/// A node in the curriculum graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Unique identifier for this concept.
    pub id: ConceptId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Concepts that must be learned first.
    #[serde(default)]
    pub prerequisites: Vec<ConceptId>,
    /// Difficulty on a 1..=5 scale.
    #[serde(default = "default_difficulty_level")]
    pub difficulty_level: u8,
    /// Estimated study time in minutes.
    #[serde(default = "default_estimated_minutes")]
    pub estimated_minutes: u32,
}

fn default_difficulty_level() -> u8 {
    1
}

fn default_estimated_minutes() -> u32 {
    30
}

impl Concept {
    pub fn new(id: ConceptId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            prerequisites: Vec::new(),
            difficulty_level: default_difficulty_level(),
            estimated_minutes: default_estimated_minutes(),
        }
    }

    pub fn with_prerequisites(mut self, prerequisites: &[ConceptId]) -> Self {
        self.prerequisites = prerequisites.to_vec();
        self
    }

    pub fn with_difficulty(mut self, level: u8) -> Self {
        self.difficulty_level = level;
        self
    }

    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    /// Field checks that need no other concept to decide.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(1..=5).contains(&self.difficulty_level) {
            return Err(CoreError::DifficultyOutOfRange {
                concept_id: self.id,
                level: self.difficulty_level,
            });
        }
        if self.estimated_minutes == 0 {
            return Err(CoreError::ZeroEstimatedMinutes(self.id));
        }
        if self.prerequisites.contains(&self.id) {
            return Err(CoreError::SelfPrerequisite(self.id));
        }
        Ok(())
    }
}

/// Bloom's taxonomy levels, from no knowledge up to creating new ideas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloomLevel {
    #[default]
    None,
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BloomLevel::None => "none",
            BloomLevel::Remember => "remember",
            BloomLevel::Understand => "understand",
            BloomLevel::Apply => "apply",
            BloomLevel::Analyze => "analyze",
            BloomLevel::Evaluate => "evaluate",
            BloomLevel::Create => "create",
        };
        f.write_str(s)
    }
}

impl FromStr for BloomLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(BloomLevel::None),
            "remember" => Ok(BloomLevel::Remember),
            "understand" => Ok(BloomLevel::Understand),
            "apply" => Ok(BloomLevel::Apply),
            "analyze" | "analyse" => Ok(BloomLevel::Analyze),
            "evaluate" => Ok(BloomLevel::Evaluate),
            "create" => Ok(BloomLevel::Create),
            other => Err(format!("unknown understanding level: {other}")),
        }
    }
}

/// A learner's standing on one concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptMastery {
    pub user_id: UserId,
    pub concept_id: ConceptId,
    /// Mastery in [0, 1].
    #[serde(default)]
    pub mastery_score: f64,
    #[serde(default)]
    pub current_level: BloomLevel,
    #[serde(default)]
    pub times_practiced: u32,
    #[serde(default)]
    pub days_since_practice: u32,
    #[serde(default)]
    pub misconceptions: Vec<String>,
}

impl ConceptMastery {
    /// A record for a concept the learner has not started.
    pub fn new(user_id: UserId, concept_id: ConceptId) -> Self {
        Self {
            user_id,
            concept_id,
            mastery_score: 0.0,
            current_level: BloomLevel::None,
            times_practiced: 0,
            days_since_practice: 0,
            misconceptions: Vec::new(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.mastery_score = score;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.mastery_score) {
            return Err(CoreError::MasteryOutOfRange {
                concept_id: self.concept_id,
                score: self.mastery_score,
            });
        }
        Ok(())
    }
}

/// Mastery records of one learner, keyed by concept.
///
/// A missing record reads as score 0 and level `none`.
#[derive(Debug, Clone, Default)]
pub struct MasteryIndex<'a> {
    by_concept: HashMap<ConceptId, &'a ConceptMastery>,
}

impl<'a> MasteryIndex<'a> {
    /// Index the records belonging to `user_id`; later duplicates win.
    pub fn for_user(masteries: &'a [ConceptMastery], user_id: UserId) -> Self {
        let by_concept = masteries
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| (m.concept_id, m))
            .collect();
        Self { by_concept }
    }

    pub fn get(&self, concept_id: ConceptId) -> Option<&'a ConceptMastery> {
        self.by_concept.get(&concept_id).copied()
    }

    pub fn score(&self, concept_id: ConceptId) -> f64 {
        self.get(concept_id).map_or(0.0, |m| m.mastery_score)
    }

    pub fn level(&self, concept_id: ConceptId) -> BloomLevel {
        self.get(concept_id).map_or(BloomLevel::None, |m| m.current_level)
    }
}

// ---------------------------------------------------------------------------
// Learning paths
// ---------------------------------------------------------------------------

/// How fast a learner moves through their path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    #[default]
    Moderate,
    Fast,
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pace::Slow => write!(f, "slow"),
            Pace::Moderate => write!(f, "moderate"),
            Pace::Fast => write!(f, "fast"),
        }
    }
}

impl FromStr for Pace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slow" => Ok(Pace::Slow),
            "moderate" => Ok(Pace::Moderate),
            "fast" => Ok(Pace::Fast),
            other => Err(format!("unknown pace: {other}")),
        }
    }
}

/// A committed curriculum order for one learner and topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub user_id: UserId,
    #[serde(default)]
    pub topic_id: TopicId,
    /// Concept ids in study order.
    pub concept_sequence: Vec<ConceptId>,
    /// Progress cursor into `concept_sequence`.
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub pace: Pace,
}

impl LearningPath {
    pub fn len(&self) -> usize {
        self.concept_sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concept_sequence.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.concept_sequence.len()
    }

    /// Concept ids from the cursor onwards.
    pub fn remaining(&self) -> &[ConceptId] {
        let start = self.current_index.min(self.concept_sequence.len());
        &self.concept_sequence[start..]
    }
}

/// One scored interaction used to adapt pace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    #[serde(default)]
    pub concept_id: Option<ConceptId>,
    /// Score in [0, 1].
    pub score: f64,
}

/// What the planner knows about the learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub user_id: UserId,
    #[serde(default)]
    pub avg_accuracy: f64,
    #[serde(default = "default_learning_style")]
    pub learning_style: String,
}

fn default_learning_style() -> String {
    "balanced".to_string()
}

impl LearnerProfile {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            avg_accuracy: 0.0,
            learning_style: default_learning_style(),
        }
    }
}
