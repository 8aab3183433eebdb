//! Core error types.
//!
//! These errors represent contract violations on the records handed to the
//! engine. Scheduling and ordering themselves never fail; a caller that
//! validates its snapshots up front will never see one of these.

use thiserror::Error;

use crate::model::{ConceptId, ItemId};

/// Errors raised when a record or argument breaks the engine's contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A review quality outside 0..=5.
    #[error("quality rating {0} is outside 0..=5")]
    InvalidQuality(u8),

    /// An easiness factor below the SM-2 floor.
    #[error("easiness factor {0} is below the 1.3 floor")]
    EasinessBelowFloor(f64),

    /// An interval that is negative or not a number.
    #[error("interval of {0} days is not a finite, non-negative number")]
    InvalidInterval(f64),

    /// More correct answers recorded than answers overall.
    #[error("{correct} correct answers exceed {reviewed} reviews")]
    CorrectExceedsReviewed { correct: u32, reviewed: u32 },

    /// A mastery score outside [0, 1].
    #[error("mastery score {score} for concept {concept_id} is outside [0, 1]")]
    MasteryOutOfRange { concept_id: ConceptId, score: f64 },

    /// A performance sample score outside [0, 1].
    #[error("performance score {0} is outside [0, 1]")]
    ScoreOutOfRange(f64),

    /// A concept difficulty outside 1..=5.
    #[error("difficulty level {level} for concept {concept_id} is outside 1..=5")]
    DifficultyOutOfRange { concept_id: ConceptId, level: u8 },

    /// A concept with no estimated study time.
    #[error("concept {0} has zero estimated minutes")]
    ZeroEstimatedMinutes(ConceptId),

    /// Two concepts sharing one id.
    #[error("duplicate concept id {0}")]
    DuplicateConcept(ConceptId),

    /// Two review items sharing one id.
    #[error("duplicate review item id {0}")]
    DuplicateItem(ItemId),

    /// A concept that lists itself as a prerequisite.
    #[error("concept {0} lists itself as a prerequisite")]
    SelfPrerequisite(ConceptId),

    /// A prerequisite id that names no concept in the set.
    #[error("concept {concept_id} requires unknown concept {prerequisite_id}")]
    UnknownPrerequisite {
        concept_id: ConceptId,
        prerequisite_id: ConceptId,
    },

    /// A review item id that is not in the snapshot.
    #[error("review item {0} not found")]
    UnknownItem(ItemId),
}

impl CoreError {
    /// Returns `true` if the error concerns concept structure rather than a
    /// single scalar field. Ordering already tolerates structural problems by
    /// leaving the affected concepts unresolved.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CoreError::SelfPrerequisite(_)
                | CoreError::UnknownPrerequisite { .. }
                | CoreError::DuplicateConcept(_)
        )
    }
}
