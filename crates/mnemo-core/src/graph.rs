//! Concept dependency graph and learning order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{Concept, ConceptId};

/// Forward edges from each concept to the concepts that require it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    dependents: HashMap<ConceptId, Vec<ConceptId>>,
}

impl DependencyGraph {
    /// Build the graph from prerequisite lists. Dependents are listed in the
    /// order their concepts appear in `concepts`.
    pub fn build(concepts: &[Concept]) -> Self {
        let mut dependents: HashMap<ConceptId, Vec<ConceptId>> = HashMap::new();
        for concept in concepts {
            for &prerequisite in &concept.prerequisites {
                dependents.entry(prerequisite).or_default().push(concept.id);
            }
        }
        Self { dependents }
    }

    /// Concepts that list `id` as a prerequisite.
    pub fn dependents(&self, id: ConceptId) -> &[ConceptId] {
        self.dependents.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A learning order plus whatever could not be placed in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologicalOrder {
    /// Concepts in a valid study order.
    pub order: Vec<ConceptId>,
    /// Concepts never released because they sit on or behind a cycle, or
    /// wait on a prerequisite missing from the set. In input order.
    pub unresolved: Vec<ConceptId>,
}

impl TopologicalOrder {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Kahn's algorithm with an easiest-first ready queue.
///
/// Among concepts whose prerequisites are all placed, the one with the
/// lowest `difficulty_level` goes next; ties go to whichever became ready
/// first, and the initial ready set is ranked by input order.
pub fn topological_order(concepts: &[Concept]) -> TopologicalOrder {
    let graph = DependencyGraph::build(concepts);

    let mut in_degree: HashMap<ConceptId, usize> = HashMap::with_capacity(concepts.len());
    let mut difficulty: HashMap<ConceptId, u8> = HashMap::with_capacity(concepts.len());
    for concept in concepts {
        *in_degree.entry(concept.id).or_default() += concept.prerequisites.len();
        difficulty.insert(concept.id, concept.difficulty_level);
    }

    // Min-heap on (difficulty, arrival).
    let mut ready: BinaryHeap<Reverse<(u8, usize, ConceptId)>> = BinaryHeap::new();
    let mut arrival = 0usize;
    for concept in concepts {
        if in_degree.get(&concept.id) == Some(&0) {
            ready.push(Reverse((concept.difficulty_level, arrival, concept.id)));
            arrival += 1;
        }
    }

    let mut order = Vec::with_capacity(concepts.len());
    while let Some(Reverse((_, _, id))) = ready.pop() {
        order.push(id);
        for &dependent in graph.dependents(id) {
            let Some(degree) = in_degree.get_mut(&dependent) else {
                continue;
            };
            *degree = degree.saturating_sub(1);
            if *degree == 0 {
                let level = difficulty.get(&dependent).copied().unwrap_or(1);
                ready.push(Reverse((level, arrival, dependent)));
                arrival += 1;
            }
        }
    }

    let unresolved: Vec<ConceptId> = concepts
        .iter()
        .filter(|c| in_degree.get(&c.id).is_some_and(|&d| d > 0))
        .map(|c| c.id)
        .collect();
    if !unresolved.is_empty() {
        tracing::warn!(
            dropped = unresolved.len(),
            ids = ?unresolved,
            "concepts left out of learning order (cycle or missing prerequisite)"
        );
    }

    TopologicalOrder { order, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(id: u64, prereqs: &[u64], difficulty: u8) -> Concept {
        Concept::new(id, format!("c{id}"))
            .with_prerequisites(prereqs)
            .with_difficulty(difficulty)
    }

    fn position(order: &[u64], id: u64) -> usize {
        order.iter().position(|&x| x == id).unwrap()
    }

    #[test]
    fn graph_has_forward_edges() {
        let concepts = vec![concept(1, &[], 1), concept(2, &[1], 1), concept(3, &[1], 1)];
        let graph = DependencyGraph::build(&concepts);
        assert_eq!(graph.dependents(1), &[2, 3]);
        assert!(graph.dependents(3).is_empty());
    }

    #[test]
    fn lower_difficulty_breaks_ties() {
        // X (3), Y (1), Z requires both.
        let concepts = vec![concept(1, &[], 3), concept(2, &[], 1), concept(3, &[1, 2], 1)];
        let result = topological_order(&concepts);
        assert_eq!(result.order, vec![2, 1, 3]);
        assert!(result.is_complete());
    }

    #[test]
    fn equal_difficulty_keeps_arrival_order() {
        let concepts = vec![concept(5, &[], 2), concept(4, &[], 2), concept(3, &[], 2)];
        assert_eq!(topological_order(&concepts).order, vec![5, 4, 3]);
    }

    #[test]
    fn released_concept_competes_with_waiting_ones() {
        // 1 (d1) releases 3 (d1); 2 (d4) was ready earlier but is harder.
        let concepts = vec![concept(1, &[], 1), concept(2, &[], 4), concept(3, &[1], 1)];
        assert_eq!(topological_order(&concepts).order, vec![1, 3, 2]);
    }

    #[test]
    fn every_concept_follows_its_prerequisites() {
        let concepts = vec![
            concept(1, &[], 5),
            concept(2, &[1], 1),
            concept(3, &[1], 3),
            concept(4, &[2, 3], 2),
            concept(5, &[], 1),
            concept(6, &[5, 4], 1),
        ];
        let result = topological_order(&concepts);
        assert_eq!(result.order.len(), concepts.len());
        for c in &concepts {
            for &p in &c.prerequisites {
                assert!(position(&result.order, p) < position(&result.order, c.id));
            }
        }
    }

    #[test]
    fn cycle_is_reported_not_hidden() {
        let concepts = vec![
            concept(1, &[], 1),
            concept(2, &[3], 1),
            concept(3, &[2], 1),
            concept(4, &[3], 1),
        ];
        let result = topological_order(&concepts);
        assert_eq!(result.order, vec![1]);
        assert_eq!(result.unresolved, vec![2, 3, 4]);
    }

    #[test]
    fn missing_prerequisite_blocks_concept() {
        let concepts = vec![concept(1, &[99], 1), concept(2, &[], 1)];
        let result = topological_order(&concepts);
        assert_eq!(result.order, vec![2]);
        assert_eq!(result.unresolved, vec![1]);
    }

    #[test]
    fn empty_input() {
        let result = topological_order(&[]);
        assert!(result.order.is_empty());
        assert!(result.is_complete());
    }
}
