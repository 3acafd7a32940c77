//! Multi-signal topic weakness scoring. Pure and deterministic: identical
//! input yields identical output, no hidden state.
//!
//! `weaknessScore(t) = ALPHA·(5 − avg) + BETA·stdDev + GAMMA·weakRatio`

use crate::types::{Member, TopicAverage, TopicWeakness};

/// Weight of the average-confidence deficit.
pub const ALPHA: f64 = 0.5;
/// Weight of the disagreement signal (population std dev).
pub const BETA: f64 = 0.3;
/// Weight of the fraction of actively lost members.
pub const GAMMA: f64 = 0.2;

/// Substituted for confidence ratings a member did not provide.
pub const NEUTRAL_RATING: f64 = 3.0;
/// Ratings at or below this mark a member as weak on the topic.
pub const WEAK_THRESHOLD: f64 = 2.0;

/// The single documented lookup site for a member's rating on a topic.
/// Missing entries default to [`NEUTRAL_RATING`].
pub fn rating_for(member: &Member, topic: &str) -> f64 {
    member.scores.get(topic).copied().unwrap_or(NEUTRAL_RATING)
}

/// Computes the weakness statistics for every topic. Callers must reject an
/// empty member list before invoking; ratings outside [1,5] are not
/// validated here.
pub fn score_topics(topics: &[String], members: &[Member]) -> Vec<TopicWeakness> {
    debug_assert!(!members.is_empty(), "scorer requires at least one member");

    topics
        .iter()
        .map(|topic| {
            let ratings: Vec<f64> = members.iter().map(|m| rating_for(m, topic)).collect();
            let avg = mean(&ratings);
            let std_dev = population_std_dev(&ratings, avg);
            let weak_count = ratings.iter().filter(|r| **r <= WEAK_THRESHOLD).count();
            let weak_ratio = weak_count as f64 / ratings.len() as f64;
            let weakness = ALPHA * (5.0 - avg) + BETA * std_dev + GAMMA * weak_ratio;
            let weak_members = members
                .iter()
                .filter(|m| rating_for(m, topic) <= WEAK_THRESHOLD)
                .map(|m| m.name.clone())
                .collect();

            TopicWeakness {
                topic: topic.clone(),
                avg: round2(avg),
                std_dev: round2(std_dev),
                weak_ratio: round2(weak_ratio),
                weakness_score: round2(weakness),
                discussion_value: round2(std_dev / (avg + 0.1)),
                weak_members,
            }
        })
        .collect()
}

/// Ranks topics by raw average confidence, lowest first (priority 1 = worst
/// collective confidence). The lightweight pre-session view.
pub fn rank_by_average(topics: &[String], members: &[Member]) -> Vec<TopicAverage> {
    let mut results: Vec<TopicAverage> = topics
        .iter()
        .map(|topic| {
            let ratings: Vec<f64> = members.iter().map(|m| rating_for(m, topic)).collect();
            let weak_members = members
                .iter()
                .filter(|m| rating_for(m, topic) <= WEAK_THRESHOLD)
                .map(|m| m.name.clone())
                .collect();

            TopicAverage {
                topic: topic.clone(),
                avg_score: round2(mean(&ratings)),
                weak_members,
                priority: 0,
            }
        })
        .collect();

    results.sort_by(|a, b| a.avg_score.total_cmp(&b.avg_score));
    for (index, entry) in results.iter_mut().enumerate() {
        entry.priority = index + 1;
    }
    results
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
