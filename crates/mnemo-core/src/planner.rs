//! Learning-path planning.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::PathEngine;
use crate::graph::topological_order;
use crate::model::{
    BloomLevel, Concept, ConceptId, LearnerProfile, LearningPath, Pace, TopicId, UserId,
};

/// Completion fractions that get a milestone.
const MILESTONE_FRACTIONS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// A proposed path, ready for the caller to commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPlan {
    pub topic_id: TopicId,
    /// Concept ids in study order.
    pub concept_sequence: Vec<ConceptId>,
    pub total_concepts: usize,
    /// Sum of estimated minutes in hours, one decimal.
    pub estimated_hours: f64,
    /// Difficulty of each concept, in sequence order.
    pub difficulty_curve: Vec<u8>,
    pub average_difficulty: f64,
    pub milestones: Vec<Milestone>,
    /// Echoed back unchanged.
    pub target_depth: BloomLevel,
    /// Concepts that could not be ordered; see [`crate::graph::TopologicalOrder`].
    #[serde(default)]
    pub unresolved: Vec<ConceptId>,
}

/// A completion marker along a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub percentage: u8,
    pub concept_id: ConceptId,
    pub name: String,
    pub description: String,
}

impl PathEngine {
    /// Order `concepts` into a path and compute its statistics.
    pub fn create_learning_path(
        &self,
        topic_id: TopicId,
        concepts: &[Concept],
        profile: &LearnerProfile,
        target_depth: BloomLevel,
    ) -> PathPlan {
        let topo = topological_order(concepts);
        let by_id: HashMap<ConceptId, &Concept> = concepts.iter().map(|c| (c.id, c)).collect();
        let ordered: Vec<&Concept> = topo
            .order
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect();
        let ordered = personalize(ordered, profile);

        let total_minutes: u64 = ordered.iter().map(|c| c.estimated_minutes as u64).sum();
        // Halves go to the even tenth: 15 minutes is 0.2 hours.
        let estimated_hours = (total_minutes as f64 / 60.0 * 10.0).round_ties_even() / 10.0;
        let difficulty_curve: Vec<u8> = ordered.iter().map(|c| c.difficulty_level).collect();
        let average_difficulty = if difficulty_curve.is_empty() {
            0.0
        } else {
            difficulty_curve.iter().map(|&d| d as f64).sum::<f64>() / difficulty_curve.len() as f64
        };

        tracing::info!(
            topic_id,
            user_id = profile.user_id,
            concepts = ordered.len(),
            unresolved = topo.unresolved.len(),
            "planned learning path"
        );

        PathPlan {
            topic_id,
            concept_sequence: ordered.iter().map(|c| c.id).collect(),
            total_concepts: ordered.len(),
            estimated_hours,
            difficulty_curve,
            average_difficulty,
            milestones: milestones(&ordered),
            target_depth,
            unresolved: topo.unresolved,
        }
    }
}

/// Hook for reordering by learner profile. Currently keeps the
/// topological order.
fn personalize<'a>(ordered: Vec<&'a Concept>, profile: &LearnerProfile) -> Vec<&'a Concept> {
    tracing::debug!(
        learning_style = %profile.learning_style,
        "personalization keeps topological order"
    );
    ordered
}

/// A milestone at each quarter, naming the last concept of that quarter.
fn milestones(sequence: &[&Concept]) -> Vec<Milestone> {
    let total = sequence.len();
    MILESTONE_FRACTIONS
        .iter()
        .filter_map(|&fraction| {
            let idx = ((total as f64 * fraction) as usize).checked_sub(1)?;
            let concept = sequence.get(idx)?;
            let percentage = (fraction * 100.0) as u8;
            Some(Milestone {
                percentage,
                concept_id: concept.id,
                name: format!("{percentage}% Complete"),
                description: format!("Mastered {}", concept.name),
            })
        })
        .collect()
}

impl LearningPath {
    /// Commit a plan as a fresh path at the start, moderate pace.
    pub fn from_plan(user_id: UserId, plan: &PathPlan) -> Self {
        Self {
            user_id,
            topic_id: plan.topic_id,
            concept_sequence: plan.concept_sequence.clone(),
            current_index: 0,
            pace: Pace::Moderate,
        }
    }
}
