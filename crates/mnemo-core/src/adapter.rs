//! Path adaptation, review suggestions, and knowledge-gap analysis.
//!
//! None of these mutate the path. Each returns a report that the caller
//! applies (or not) to its own copy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::PathConfig;
use crate::engine::PathEngine;
use crate::model::{
    BloomLevel, Concept, ConceptId, ConceptMastery, LearningPath, MasteryIndex, Pace,
    PerformanceSample, UserId,
};

/// Suggested changes to a path after recent performance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathAdaptation {
    /// Mean score over the samples; zero when there were none.
    pub average_score: f64,
    /// New pace, if it should change.
    pub pace_change: Option<Pace>,
    /// Human-readable notes, one per adjustment.
    pub adjustments_made: Vec<String>,
    /// Concepts below the struggling threshold.
    pub struggling_concepts: Vec<ConceptId>,
    /// Concepts mastered well enough to skip.
    pub concepts_skipped: Vec<ConceptId>,
}

/// A concept worth revisiting, with its priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSuggestion {
    pub concept_id: ConceptId,
    pub priority_score: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    /// Concept looks mastered but rests on weak prerequisites.
    WeakFoundation,
    /// Concept is understood but has not been applied yet.
    NeedsApplication,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGap {
    pub kind: GapKind,
    pub concept_id: ConceptId,
    /// Only populated for `WeakFoundation`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weak_prerequisites: Vec<ConceptId>,
    pub severity: Severity,
    pub recommendation: String,
}

impl PathEngine {
    /// Decide a pace change from recent scores and list struggling and
    /// skippable concepts.
    ///
    /// Pace moves to fast above `pace_up_score` and to slow below
    /// `pace_down_score`; the band in between leaves it alone. The mean
    /// divides by at least one, so an empty window scores zero and slows
    /// the path down.
    pub fn adapt_path(
        &self,
        path: &LearningPath,
        recent_performance: &[PerformanceSample],
        masteries: &[ConceptMastery],
    ) -> PathAdaptation {
        let cfg = &self.config;
        let mut report = PathAdaptation::default();

        let total: f64 = recent_performance.iter().map(|p| p.score).sum();
        report.average_score = total / recent_performance.len().max(1) as f64;

        if report.average_score > cfg.pace_up_score && path.pace != Pace::Fast {
            report.pace_change = Some(Pace::Fast);
            report
                .adjustments_made
                .push("Increased pace due to strong performance".into());
        } else if report.average_score < cfg.pace_down_score && path.pace != Pace::Slow {
            report.pace_change = Some(Pace::Slow);
            report
                .adjustments_made
                .push("Slowed pace to strengthen fundamentals".into());
        }

        let own: Vec<&ConceptMastery> = masteries
            .iter()
            .filter(|m| m.user_id == path.user_id)
            .collect();

        report.struggling_concepts = own
            .iter()
            .filter(|m| m.mastery_score < cfg.struggling_below)
            .map(|m| m.concept_id)
            .collect();
        if !report.struggling_concepts.is_empty() {
            report.adjustments_made.push(format!(
                "Identified {} concepts needing review",
                report.struggling_concepts.len()
            ));
        }

        report.concepts_skipped = own
            .iter()
            .filter(|m| m.mastery_score > cfg.skip_above)
            .map(|m| m.concept_id)
            .collect();
        if !report.concepts_skipped.is_empty() {
            report.adjustments_made.push(format!(
                "Skipping {} mastered concepts",
                report.concepts_skipped.len()
            ));
        }

        tracing::debug!(
            user_id = path.user_id,
            average_score = report.average_score,
            pace_change = ?report.pace_change,
            "adapted learning path"
        );
        report
    }

    /// Rank a learner's concepts for review.
    ///
    /// Scoring: +3 for mastery strictly inside the consolidation band
    /// (`review_band_low`..`review_band_high`), +2 when the concept is in
    /// `upcoming` (a prerequisite of something still ahead), +2 for more than
    /// `stale_after_days` without practice, +1 for any recorded misconception.
    /// Zero-score concepts are dropped; ties keep input order.
    pub fn suggest_review_concepts(
        &self,
        user_id: UserId,
        masteries: &[ConceptMastery],
        upcoming: &HashSet<ConceptId>,
        max_suggestions: usize,
    ) -> Vec<ReviewSuggestion> {
        let cfg = &self.config;
        let mut suggestions: Vec<ReviewSuggestion> = masteries
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                let is_upcoming = upcoming.contains(&m.concept_id);
                let mut score = 0;
                if consolidating(cfg, m) {
                    score += 3;
                }
                if is_upcoming {
                    score += 2;
                }
                if stale(cfg, m) {
                    score += 2;
                }
                if !m.misconceptions.is_empty() {
                    score += 1;
                }
                (score > 0).then(|| ReviewSuggestion {
                    concept_id: m.concept_id,
                    priority_score: score,
                    reason: review_reason(cfg, m, is_upcoming),
                })
            })
            .collect();

        suggestions.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
        suggestions.truncate(max_suggestions);
        suggestions
    }

    /// Find weak foundations and concepts that need applied practice.
    ///
    /// Only concepts with a mastery record are considered. One concept can
    /// yield both kinds of gap.
    pub fn identify_knowledge_gaps(
        &self,
        user_id: UserId,
        masteries: &[ConceptMastery],
        concepts: &[Concept],
    ) -> Vec<KnowledgeGap> {
        let cfg = &self.config;
        let index = MasteryIndex::for_user(masteries, user_id);
        let mut gaps = Vec::new();

        for concept in concepts {
            let Some(mastery) = index.get(concept.id) else {
                continue;
            };

            if mastery.mastery_score > cfg.weak_foundation_concept {
                let weak: Vec<ConceptId> = concept
                    .prerequisites
                    .iter()
                    .copied()
                    .filter(|&p| index.score(p) < cfg.weak_foundation_prerequisite)
                    .collect();
                if !weak.is_empty() {
                    gaps.push(KnowledgeGap {
                        kind: GapKind::WeakFoundation,
                        concept_id: concept.id,
                        weak_prerequisites: weak,
                        severity: Severity::High,
                        recommendation: "Review foundational concepts before proceeding".into(),
                    });
                }
            }

            if mastery.current_level == BloomLevel::Understand {
                gaps.push(KnowledgeGap {
                    kind: GapKind::NeedsApplication,
                    concept_id: concept.id,
                    weak_prerequisites: Vec::new(),
                    severity: Severity::Medium,
                    recommendation: "Practice applying this concept in different contexts".into(),
                });
            }
        }

        gaps
    }
}

fn consolidating(cfg: &PathConfig, m: &ConceptMastery) -> bool {
    m.mastery_score > cfg.review_band_low && m.mastery_score < cfg.review_band_high
}

fn stale(cfg: &PathConfig, m: &ConceptMastery) -> bool {
    m.days_since_practice > cfg.stale_after_days
}

fn review_reason(cfg: &PathConfig, m: &ConceptMastery, is_upcoming: bool) -> String {
    let mut reasons = Vec::new();
    if consolidating(cfg, m) {
        reasons.push("solidify understanding");
    }
    if is_upcoming {
        reasons.push("prepare for upcoming concepts");
    }
    if stale(cfg, m) {
        reasons.push("refresh memory");
    }
    if !m.misconceptions.is_empty() {
        reasons.push("address misconceptions");
    }
    if reasons.is_empty() {
        "periodic review".to_string()
    } else {
        reasons.join(", ")
    }
}
