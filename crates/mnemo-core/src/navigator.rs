//! Choosing the next concept along a committed path.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::engine::PathEngine;
use crate::model::{Concept, ConceptId, ConceptMastery, LearningPath, MasteryIndex};

/// The concept a learner should study next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextConcept {
    pub concept: Concept,
    /// Position of the concept in the path sequence.
    pub index: usize,
    /// `index / len * 100`.
    pub progress: f64,
    pub prerequisites_met: bool,
}

impl PathEngine {
    /// Scan forward from the path cursor for the first concept whose
    /// prerequisites are all mastered and which is not yet mastered itself.
    ///
    /// Concepts missing from `concepts` or still gated are passed over; the
    /// scan never looks behind the cursor. `None` means the path is done.
    pub fn next_concept(
        &self,
        path: &LearningPath,
        masteries: &[ConceptMastery],
        concepts: &[Concept],
    ) -> Option<NextConcept> {
        if path.is_complete() {
            return None;
        }

        let index = MasteryIndex::for_user(masteries, path.user_id);
        let catalog: HashMap<ConceptId, &Concept> = concepts.iter().map(|c| (c.id, c)).collect();
        let len = path.len();

        for (position, concept_id) in path
            .concept_sequence
            .iter()
            .enumerate()
            .skip(path.current_index)
        {
            let Some(concept) = catalog.get(concept_id) else {
                tracing::debug!(concept_id, "path names a concept missing from the catalog");
                continue;
            };

            if !self.prerequisites_met(concept, &index) {
                continue;
            }

            let mastered = index
                .get(concept.id)
                .is_some_and(|m| m.mastery_score >= self.config.mastered_threshold);
            if !mastered {
                return Some(NextConcept {
                    concept: (*concept).clone(),
                    index: position,
                    progress: position as f64 / len as f64 * 100.0,
                    prerequisites_met: true,
                });
            }
        }

        None
    }

    /// Whether every prerequisite has reached the gate threshold. A missing
    /// record counts as zero mastery.
    pub fn prerequisites_met(&self, concept: &Concept, index: &MasteryIndex<'_>) -> bool {
        concept
            .prerequisites
            .iter()
            .all(|&p| index.score(p) >= self.config.prerequisite_threshold)
    }
}

/// Prerequisites of every concept from the path cursor onwards.
pub fn upcoming_prerequisites(path: &LearningPath, concepts: &[Concept]) -> HashSet<ConceptId> {
    let catalog: HashMap<ConceptId, &Concept> = concepts.iter().map(|c| (c.id, c)).collect();
    path.remaining()
        .iter()
        .filter_map(|id| catalog.get(id))
        .flat_map(|c| c.prerequisites.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pace;

    fn path(sequence: Vec<u64>, current_index: usize) -> LearningPath {
        LearningPath {
            user_id: 1,
            topic_id: 1,
            concept_sequence: sequence,
            current_index,
            pace: Pace::Moderate,
        }
    }

    fn catalog() -> Vec<Concept> {
        vec![
            Concept::new(1, "Variables"),
            Concept::new(2, "Loops").with_prerequisites(&[1]),
            Concept::new(3, "Functions").with_prerequisites(&[1]),
            Concept::new(4, "Recursion").with_prerequisites(&[3]),
        ]
    }

    fn mastery(concept: u64, score: f64) -> ConceptMastery {
        ConceptMastery::new(1, concept).with_score(score)
    }

    #[test]
    fn first_unmastered_concept_is_next() {
        let engine = PathEngine::default();
        let next = engine
            .next_concept(&path(vec![1, 2, 3, 4], 0), &[], &catalog())
            .unwrap();
        assert_eq!(next.concept.id, 1);
        assert_eq!(next.index, 0);
        assert_eq!(next.progress, 0.0);
        assert!(next.prerequisites_met);
    }

    #[test]
    fn mastered_concepts_are_passed_over() {
        let engine = PathEngine::default();
        let masteries = vec![mastery(1, 0.85)];
        let next = engine
            .next_concept(&path(vec![1, 2, 3, 4], 0), &masteries, &catalog())
            .unwrap();
        assert_eq!(next.concept.id, 2);
        assert_eq!(next.progress, 25.0);
    }

    #[test]
    fn weak_prerequisite_gates_concept() {
        let engine = PathEngine::default();
        // Prerequisite at 0.5 blocks 2 and 3; 4 depends on 3 (no record).
        let masteries = vec![mastery(1, 0.5)];
        let next = engine.next_concept(&path(vec![1, 2, 3, 4], 1), &masteries, &catalog());
        assert_eq!(next, None);
    }

    #[test]
    fn scan_starts_at_cursor() {
        let engine = PathEngine::default();
        let masteries = vec![mastery(1, 0.9), mastery(3, 0.75)];
        let next = engine
            .next_concept(&path(vec![1, 3, 2, 4], 2), &masteries, &catalog())
            .unwrap();
        assert_eq!(next.concept.id, 2);
        assert_eq!(next.index, 2);
        assert_eq!(next.progress, 50.0);
    }

    #[test]
    fn complete_path_returns_none() {
        let engine = PathEngine::default();
        assert_eq!(engine.next_concept(&path(vec![1, 2], 2), &[], &catalog()), None);
        assert_eq!(engine.next_concept(&path(vec![], 0), &[], &catalog()), None);
    }

    #[test]
    fn everything_mastered_returns_none() {
        let engine = PathEngine::default();
        let masteries: Vec<ConceptMastery> = (1..=4).map(|c| mastery(c, 0.95)).collect();
        assert_eq!(
            engine.next_concept(&path(vec![1, 2, 3, 4], 0), &masteries, &catalog()),
            None
        );
    }

    #[test]
    fn other_users_mastery_is_ignored() {
        let engine = PathEngine::default();
        let masteries = vec![ConceptMastery::new(2, 1).with_score(1.0)];
        let next = engine
            .next_concept(&path(vec![1, 2], 0), &masteries, &catalog())
            .unwrap();
        assert_eq!(next.concept.id, 1);
    }

    #[test]
    fn unknown_concepts_are_skipped() {
        let engine = PathEngine::default();
        let next = engine
            .next_concept(&path(vec![99, 1], 0), &[], &catalog())
            .unwrap();
        assert_eq!(next.concept.id, 1);
        assert_eq!(next.index, 1);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let engine = PathEngine::default();
        let masteries = vec![mastery(1, 0.8)];
        let p = path(vec![1, 2, 3, 4], 0);
        let first = engine.next_concept(&p, &masteries, &catalog());
        let second = engine.next_concept(&p, &masteries, &catalog());
        assert_eq!(first, second);
    }

    #[test]
    fn upcoming_prerequisites_from_cursor() {
        let upcoming = upcoming_prerequisites(&path(vec![1, 2, 3, 4], 3), &catalog());
        assert_eq!(upcoming, HashSet::from([3]));
        let all = upcoming_prerequisites(&path(vec![1, 2, 3, 4], 0), &catalog());
        assert_eq!(all, HashSet::from([1, 3]));
    }
}
