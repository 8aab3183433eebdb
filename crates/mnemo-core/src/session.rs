//! Review session assembly and bookkeeping.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::model::{ItemId, ReviewItem, TopicId};
use crate::scheduler::{get_due_items, get_new_items, interleave_items};

/// Picks which items a review session presents.
#[derive(Debug, Clone, Default)]
pub struct SessionPlanner {
    config: SchedulerConfig,
}

impl SessionPlanner {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// How many new items a session of `session_size` offers.
    pub fn new_item_quota(&self) -> usize {
        self.config
            .min_new_items
            .max(self.config.session_size / 3)
    }

    /// Assemble a session: due items first, then new items, interleaved by
    /// topic when enabled and cut to the session size.
    ///
    /// A never-reviewed item is usually also due; it takes a new-item slot
    /// and is not repeated among the due items.
    pub fn select_items<'a>(
        &self,
        items: &'a [ReviewItem],
        now: DateTime<Utc>,
    ) -> Vec<&'a ReviewItem> {
        let limit = self.config.session_size;
        let fresh = get_new_items(items, self.new_item_quota());
        let fresh_ids: HashSet<ItemId> = fresh.iter().map(|i| i.id).collect();

        let due_slots = limit.saturating_sub(fresh.len());
        let mut selected: Vec<&ReviewItem> = get_due_items(items, now)
            .into_iter()
            .filter(|i| !fresh_ids.contains(&i.id))
            .take(due_slots)
            .collect();
        selected.extend(fresh);

        let mut selected = interleave_items(selected, self.config.interleaving_ratio);
        selected.truncate(limit);

        tracing::debug!(
            candidates = items.len(),
            selected = selected.len(),
            "assembled review session"
        );
        selected
    }
}

/// One answered item within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnswer {
    pub item_id: ItemId,
    pub topic_id: TopicId,
    pub is_correct: bool,
}

/// End-of-session statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_answers: usize,
    pub correct_answers: usize,
    /// Percentage rounded to two decimals; zero for an empty session.
    pub accuracy_percent: f64,
    pub topics_covered: usize,
    /// Wall-clock length in fractional minutes, never negative.
    pub duration_minutes: f64,
}

pub fn summarize_session(
    answers: &[SessionAnswer],
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
) -> SessionSummary {
    let total = answers.len();
    let correct = answers.iter().filter(|a| a.is_correct).count();
    let accuracy = if total == 0 {
        0.0
    } else {
        round2(correct as f64 / total as f64 * 100.0)
    };
    let topics: HashSet<TopicId> = answers.iter().map(|a| a.topic_id).collect();
    let elapsed_ms = (ended_at - started_at).num_milliseconds().max(0);

    SessionSummary {
        total_answers: total,
        correct_answers: correct,
        accuracy_percent: accuracy,
        topics_covered: topics.len(),
        duration_minutes: elapsed_ms as f64 / 60_000.0,
    }
}

/// Lifetime review statistics for one learner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerStats {
    pub total_reviews: u64,
    /// Running mean of correctness in [0, 1].
    pub avg_accuracy: f64,
}

impl LearnerStats {
    /// Fold one answer into the running mean.
    pub fn record(&mut self, is_correct: bool) {
        let hit = if is_correct { 1.0 } else { 0.0 };
        self.total_reviews += 1;
        let n = self.total_reviews as f64;
        self.avg_accuracy = (self.avg_accuracy * (n - 1.0) + hit) / n;
    }

    pub fn accuracy_percent(&self) -> f64 {
        round2(self.avg_accuracy * 100.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
