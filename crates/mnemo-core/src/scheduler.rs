//! SM-2 review scheduling.
//!
//! Implements the classic SuperMemo-2 interval schedule (Wozniak, 1990) with
//! the usual 1.3 easiness floor, plus due/new filtering, topic interleaving,
//! and per-item difficulty adaptation.
//!
//! Every function here is pure: the current time is always an argument.
//! Answers for the same item must be applied in submission order, since
//! two SM-2 steps do not commute.

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DifficultyTier, Quality, ReviewItem, TopicId, MIN_EASINESS};

/// Interval after the first successful recall.
pub const FIRST_INTERVAL_DAYS: f64 = 1.0;

/// Interval after the second successful recall.
pub const SECOND_INTERVAL_DAYS: f64 = 6.0;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Result of one SM-2 step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub repetitions: u32,
    pub easiness_factor: f64,
    pub interval_days: f64,
    pub next_review_date: DateTime<Utc>,
}

/// SM-2 easiness update.
///
/// EF' = max(1.3, EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)))
pub fn next_easiness(quality: Quality, easiness_factor: f64) -> f64 {
    let miss = (Quality::MAX - quality.value()) as f64;
    let delta = 0.1 - miss * (0.08 + miss * 0.02);
    (easiness_factor + delta).max(MIN_EASINESS)
}

/// Compute the next repetition count, easiness, interval, and due date.
///
/// A failed recall (quality < 3) resets the item to repetition 0 with a zero
/// interval, so it is due again at `now`. Successes follow the 1 day, 6 days,
/// then `previous interval * EF'` schedule.
pub fn calculate_next_review(
    quality: Quality,
    repetitions: u32,
    easiness_factor: f64,
    interval_days: f64,
    now: DateTime<Utc>,
) -> ReviewOutcome {
    let easiness_factor = next_easiness(quality, easiness_factor);

    let (repetitions, interval_days) = if !quality.is_pass() {
        (0, 0.0)
    } else {
        let interval = match repetitions {
            0 => FIRST_INTERVAL_DAYS,
            1 => SECOND_INTERVAL_DAYS,
            _ => interval_days * easiness_factor,
        };
        (repetitions.saturating_add(1), interval)
    };

    ReviewOutcome {
        repetitions,
        easiness_factor,
        interval_days,
        next_review_date: add_days(now, interval_days),
    }
}

/// Add a fractional number of days, saturating at the latest representable
/// instant.
fn add_days(now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    let ms = (days * MS_PER_DAY).round() as i64;
    TimeDelta::try_milliseconds(ms)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Items whose due date is at or before `now`, in input order.
pub fn get_due_items(items: &[ReviewItem], now: DateTime<Utc>) -> Vec<&ReviewItem> {
    items.iter().filter(|item| item.is_due(now)).collect()
}

/// The first `limit` never-reviewed items, in input order.
pub fn get_new_items(items: &[ReviewItem], limit: usize) -> Vec<&ReviewItem> {
    items.iter().filter(|item| item.is_new()).take(limit).collect()
}

/// Round-robin items across topics.
///
/// Items are grouped by topic (groups ordered by first appearance, items
/// keeping their relative order) and then drawn one per group per round
/// until every group is empty. `ratio` only switches this on or off: any
/// positive value interleaves fully, zero or below returns the input as is.
pub fn interleave_items<T: Borrow<ReviewItem>>(items: Vec<T>, ratio: f64) -> Vec<T> {
    if ratio <= 0.0 || items.is_empty() {
        return items;
    }

    let total = items.len();
    let mut slot_of: HashMap<TopicId, usize> = HashMap::new();
    let mut groups: Vec<VecDeque<T>> = Vec::new();
    for item in items {
        let topic = item.borrow().topic_id;
        let slot = *slot_of.entry(topic).or_insert_with(|| {
            groups.push(VecDeque::new());
            groups.len() - 1
        });
        groups[slot].push_back(item);
    }

    let mut interleaved = Vec::with_capacity(total);
    while interleaved.len() < total {
        for group in groups.iter_mut() {
            if let Some(item) = group.pop_front() {
                interleaved.push(item);
            }
        }
    }
    interleaved
}

/// Step the difficulty tier by at most one based on running accuracy.
///
/// A correct answer on an item answered correctly more than 90% of the time
/// makes it harder; a wrong answer below 40% accuracy makes it easier.
pub fn adjust_difficulty(item: &ReviewItem, is_correct: bool) -> DifficultyTier {
    let accuracy = item.accuracy();
    if is_correct && accuracy > 0.9 {
        item.difficulty.harder()
    } else if !is_correct && accuracy < 0.4 {
        item.difficulty.easier()
    } else {
        item.difficulty
    }
}

/// Apply one answer to an item and return the updated snapshot.
///
/// Counters are bumped first, then the SM-2 step runs, then difficulty is
/// adjusted against the updated counters.
pub fn record_answer(
    item: &ReviewItem,
    quality: Quality,
    is_correct: bool,
    now: DateTime<Utc>,
) -> ReviewItem {
    let mut updated = item.clone();
    updated.times_reviewed = updated.times_reviewed.saturating_add(1);
    if is_correct {
        updated.times_correct = updated.times_correct.saturating_add(1);
    }
    updated.last_reviewed = Some(now);

    let outcome = calculate_next_review(
        quality,
        item.repetitions,
        item.easiness_factor,
        item.interval_days,
        now,
    );
    updated.repetitions = outcome.repetitions;
    updated.easiness_factor = outcome.easiness_factor;
    updated.interval_days = outcome.interval_days;
    updated.next_review_date = outcome.next_review_date;
    updated.difficulty = adjust_difficulty(&updated, is_correct);

    tracing::debug!(
        item_id = item.id,
        quality = quality.value(),
        repetitions = updated.repetitions,
        interval_days = updated.interval_days,
        difficulty = %updated.difficulty,
        "scheduled review"
    );

    updated
}
