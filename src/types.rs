use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::allocation::MIN_BLOCK_MINUTES;

/// A participant's setup entry: unique name plus a partial topic → confidence
/// mapping in [1,5]. Topics absent from `scores` count as neutral (3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default)]
    pub scores: HashMap<String, f64>,
}

/// The raw setup input a session is created from, kept verbatim on the
/// session for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSetup {
    pub topics: Vec<String>,
    pub members: Vec<Member>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
}

/// Outcome of one practice answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerOutcome {
    Correct,
    Partial,
    Incorrect,
}

/// Per-topic weakness statistics produced by the scorer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicWeakness {
    pub topic: String,
    pub avg: f64,
    pub std_dev: f64,
    pub weak_ratio: f64,
    pub weakness_score: f64,
    pub discussion_value: f64,
    pub weak_members: Vec<String>,
}

/// One entry of the ranked topic list polled by clients. `adjusted_score`
/// appears once the first re-rank has happened.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedTopic {
    pub topic: String,
    pub avg: f64,
    pub std_dev: f64,
    pub weak_ratio: f64,
    pub weakness_score: f64,
    pub discussion_value: f64,
    pub weak_members: Vec<String>,
    pub priority: usize,
    pub allocated_minutes: u32,
    pub critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_score: Option<f64>,
}

/// The authoritative mutable per-topic counters of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRecord {
    pub allocated_minutes: u32,
    pub incorrect_count: u32,
    pub correct_count: u32,
    pub critical: bool,
}

impl AllocationRecord {
    /// Seed record for a topic entering the session with `minutes` allocated.
    pub fn seeded(minutes: u32) -> Self {
        Self {
            allocated_minutes: minutes,
            incorrect_count: 0,
            correct_count: 0,
            critical: false,
        }
    }

    /// Record for a topic first seen mid-session: floor minutes, clean counters.
    pub fn at_floor() -> Self {
        Self::seeded(MIN_BLOCK_MINUTES)
    }
}

/// Per-topic average ranking, lowest confidence first.
#[derive(Debug, Clone, Serialize)]
pub struct TopicAverage {
    pub topic: String,
    pub avg_score: f64,
    pub weak_members: Vec<String>,
    pub priority: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session_id: String,
    pub topics: Vec<PrioritizedTopic>,
}

/// Poll payload for one session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub course: Option<String>,
    pub prioritized_topics: Vec<PrioritizedTopic>,
    pub current_block: u32,
    pub online_members: Vec<String>,
    pub topic_stats: HashMap<String, AllocationRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinAck {
    pub ok: bool,
    pub course: Option<String>,
    pub online_members: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerAck {
    pub prioritized_topics: Vec<PrioritizedTopic>,
    pub topic_stats: HashMap<String, AllocationRecord>,
}
