//! Live session state: the authoritative per-topic allocation records, the
//! ranked view derived from them, member presence, and the adaptive
//! reallocation applied on every answer event.

use std::collections::HashMap;

use crate::allocation::MIN_BLOCK_MINUTES;
use crate::types::{
    AllocationRecord, AnswerOutcome, PrioritizedTopic, SessionSetup, SessionSnapshot,
};

/// Minutes moved from donor to target on each incorrect answer.
pub const TRANSFER_MINUTES: u32 = 5;
/// Incorrect answers after which a topic is flagged critical for the rest of
/// the session.
pub const CRITICAL_THRESHOLD: u32 = 2;
/// Adjusted-score boost per incorrect answer when re-ranking.
pub const INCORRECT_BOOST: f64 = 0.15;

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub created_at: i64,
    pub setup: SessionSetup,
    /// Ranked view served to polling clients; re-derived from `topic_stats`
    /// on every reallocation.
    pub prioritized_topics: Vec<PrioritizedTopic>,
    /// Authoritative mutable per-topic state.
    pub topic_stats: HashMap<String, AllocationRecord>,
    pub current_block: u32,
    /// Member name → last heartbeat, epoch milliseconds. Never swept.
    pub presence: HashMap<String, i64>,
}

impl Session {
    pub fn new(id: String, setup: SessionSetup, topics: Vec<PrioritizedTopic>) -> Self {
        let topic_stats = topics
            .iter()
            .map(|t| (t.topic.clone(), AllocationRecord::seeded(t.allocated_minutes)))
            .collect();

        Self {
            id,
            created_at: now_ms(),
            setup,
            prioritized_topics: topics,
            topic_stats,
            current_block: 0,
            presence: HashMap::new(),
        }
    }

    /// Records a heartbeat for `name` at `now`. Re-joining simply refreshes.
    pub fn touch(&mut self, name: &str, now: i64) {
        self.presence.insert(name.to_string(), now);
    }

    /// Members whose last heartbeat is within `window_ms` of `now`, sorted
    /// for deterministic payloads. Pure read; stale entries stay in the map.
    pub fn online_members_at(&self, now: i64, window_ms: i64) -> Vec<String> {
        let mut online: Vec<String> = self
            .presence
            .iter()
            .filter(|(_, last_seen)| now - **last_seen < window_ms)
            .map(|(name, _)| name.clone())
            .collect();
        online.sort();
        online
    }

    pub fn snapshot(&self, now: i64, window_ms: i64) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            course: self.setup.course.clone(),
            prioritized_topics: self.prioritized_topics.clone(),
            current_block: self.current_block,
            online_members: self.online_members_at(now, window_ms),
            topic_stats: self.topic_stats.clone(),
        }
    }

    /// Applies one answer outcome to `topic`. A topic unknown to the session
    /// gets a floor allocation record before the outcome is applied.
    ///
    /// `correct` only bumps the counter and refreshes the ranked view;
    /// `partial` additionally triggers a re-rank; `incorrect` also steals
    /// [`TRANSFER_MINUTES`] from the most confident donor still above the
    /// floor and may flag the topic critical.
    pub fn record_answer(&mut self, topic: &str, outcome: AnswerOutcome) {
        if !self.topic_stats.contains_key(topic) {
            self.topic_stats
                .insert(topic.to_string(), AllocationRecord::at_floor());
        }

        match outcome {
            AnswerOutcome::Correct => {
                if let Some(record) = self.topic_stats.get_mut(topic) {
                    record.correct_count += 1;
                }
                self.sync_ranked_view();
            }
            AnswerOutcome::Partial => {
                if let Some(record) = self.topic_stats.get_mut(topic) {
                    record.incorrect_count += 1;
                }
                self.rerank();
            }
            AnswerOutcome::Incorrect => {
                if let Some(record) = self.topic_stats.get_mut(topic) {
                    record.incorrect_count += 1;
                    // Monotonic: once set, never cleared within the session.
                    if record.incorrect_count >= CRITICAL_THRESHOLD {
                        record.critical = true;
                    }
                }

                if let Some(donor) = self.select_donor(topic) {
                    if let Some(record) = self.topic_stats.get_mut(&donor) {
                        record.allocated_minutes -= TRANSFER_MINUTES;
                    }
                    if let Some(record) = self.topic_stats.get_mut(topic) {
                        record.allocated_minutes += TRANSFER_MINUTES;
                    }
                    tracing::debug!(
                        session_id = %self.id,
                        donor = %donor,
                        target = %topic,
                        minutes = TRANSFER_MINUTES,
                        "reallocated study time"
                    );
                }

                self.rerank();
            }
        }
    }

    /// Picks the topic to give up [`TRANSFER_MINUTES`]: highest average
    /// confidence among all other topics that would stay at or above the
    /// floor after donating. Ties break to the first match in current
    /// ranked-list order. `None` when no topic can spare time.
    fn select_donor(&self, target: &str) -> Option<String> {
        let mut best: Option<&PrioritizedTopic> = None;
        for candidate in &self.prioritized_topics {
            if candidate.topic == target {
                continue;
            }
            let minutes = self
                .topic_stats
                .get(&candidate.topic)
                .map(|r| r.allocated_minutes)
                .unwrap_or(0);
            if minutes < MIN_BLOCK_MINUTES + TRANSFER_MINUTES {
                continue;
            }
            match best {
                Some(current) if candidate.avg <= current.avg => {}
                _ => best = Some(candidate),
            }
        }
        best.map(|t| t.topic.clone())
    }

    /// Full re-rank from the authoritative records: adjusted score boosts
    /// repeatedly missed topics, minutes and critical flags are copied into
    /// the ranked view, priorities reassigned 1..N.
    fn rerank(&mut self) {
        for entry in &mut self.prioritized_topics {
            let record = self.topic_stats.get(&entry.topic);
            let incorrect = record.map(|r| r.incorrect_count).unwrap_or(0);
            entry.adjusted_score =
                Some(entry.weakness_score + INCORRECT_BOOST * incorrect as f64);
            if let Some(record) = record {
                entry.allocated_minutes = record.allocated_minutes;
                entry.critical = record.critical;
            }
        }

        self.prioritized_topics.sort_by(|a, b| {
            let a_score = a.adjusted_score.unwrap_or(a.weakness_score);
            let b_score = b.adjusted_score.unwrap_or(b.weakness_score);
            b_score.total_cmp(&a_score)
        });

        for (index, entry) in self.prioritized_topics.iter_mut().enumerate() {
            entry.priority = index + 1;
        }
    }

    /// Refreshes minutes and critical flags in the ranked view without
    /// re-ranking, so polling clients see consistent state after correct
    /// answers too.
    fn sync_ranked_view(&mut self) {
        for entry in &mut self.prioritized_topics {
            if let Some(record) = self.topic_stats.get(&entry.topic) {
                entry.allocated_minutes = record.allocated_minutes;
                entry.critical = record.critical;
            }
        }
    }
}
