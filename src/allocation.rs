//! Shared-time allocation across ranked topics.
//!
//! `timeWeight(t) = weaknessScore(t) / Σ weaknessScore` (denominator 1 when
//! the sum is zero), `allocatedMinutes(t) = max(5, round(weight × total))`.
//! Rounding plus the floor means the minutes need not sum to the budget
//! exactly; the drift is an accepted design choice and is never
//! re-normalized.

use crate::types::{PrioritizedTopic, TopicWeakness};

/// No topic block is ever scheduled below this.
pub const MIN_BLOCK_MINUTES: u32 = 5;

/// Turns weakness statistics into the ranked topic list that seeds a new
/// session. Sort is stable descending by weakness score, so equally weak
/// topics keep their original order.
pub fn allocate(stats: Vec<TopicWeakness>, total_minutes: f64) -> Vec<PrioritizedTopic> {
    let score_sum: f64 = stats.iter().map(|t| t.weakness_score).sum();
    let denominator = if score_sum == 0.0 { 1.0 } else { score_sum };

    let mut ranked = stats;
    ranked.sort_by(|a, b| b.weakness_score.total_cmp(&a.weakness_score));

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, stat)| {
            let weight = stat.weakness_score / denominator;
            let minutes = (weight * total_minutes).round() as u32;

            PrioritizedTopic {
                topic: stat.topic,
                avg: stat.avg,
                std_dev: stat.std_dev,
                weak_ratio: stat.weak_ratio,
                weakness_score: stat.weakness_score,
                discussion_value: stat.discussion_value,
                weak_members: stat.weak_members,
                priority: index + 1,
                allocated_minutes: minutes.max(MIN_BLOCK_MINUTES),
                critical: false,
                adjusted_score: None,
            }
        })
        .collect()
}
