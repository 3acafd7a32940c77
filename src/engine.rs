//! Transport-independent boundary operations: validation, then one atomic
//! step against the store. Each operation either fully applies its mutation
//! or applies none.

use crate::allocation::allocate;
use crate::error::EngineError;
use crate::scoring::{rank_by_average, score_topics};
use crate::session::now_ms;
use crate::store::SessionStore;
use crate::types::{
    AnswerAck, AnswerOutcome, JoinAck, Member, SessionCreated, SessionSnapshot, SessionSetup,
    TopicAverage,
};

/// Scores and ranks the setup topics, allocates the session duration across
/// them, and stores the new session.
pub fn create_session<S: SessionStore>(
    store: &S,
    setup: SessionSetup,
) -> Result<SessionCreated, EngineError> {
    if setup.topics.is_empty() || setup.members.is_empty() {
        return Err(EngineError::validation("topics and members are required"));
    }
    let duration = setup
        .duration_minutes
        .unwrap_or(store.config().default_duration_minutes);
    if !duration.is_finite() || duration <= 0.0 {
        return Err(EngineError::validation("duration_minutes must be positive"));
    }

    let stats = score_topics(&setup.topics, &setup.members);
    let ranked = allocate(stats, duration);

    let session_id = store.create(setup, ranked.clone());
    tracing::debug!(
        session_id = %session_id,
        topics = ranked.len(),
        duration,
        "session seeded from setup input"
    );

    Ok(SessionCreated {
        session_id,
        topics: ranked,
    })
}

/// Poll operation: current ranked topics, counters, and who is online.
pub fn get_session<S: SessionStore>(
    store: &S,
    id: &str,
) -> Result<SessionSnapshot, EngineError> {
    let window = store.config().presence_window_ms;
    store
        .with_session(id, |session| session.snapshot(now_ms(), window))
        .ok_or_else(|| EngineError::SessionNotFound(id.to_uppercase()))
}

/// Registers (or refreshes) a member's presence. Re-joining is idempotent.
pub fn join<S: SessionStore>(store: &S, id: &str, name: &str) -> Result<JoinAck, EngineError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EngineError::validation("name is required"));
    }

    let window = store.config().presence_window_ms;
    store
        .with_session(id, |session| {
            let now = now_ms();
            session.touch(name, now);
            JoinAck {
                ok: true,
                course: session.setup.course.clone(),
                online_members: session.online_members_at(now, window),
            }
        })
        .ok_or_else(|| EngineError::SessionNotFound(id.to_uppercase()))
}

/// Keep-alive. A blank name is a silent no-op (heartbeats are
/// fire-and-forget), but the session itself must exist.
pub fn heartbeat<S: SessionStore>(store: &S, id: &str, name: &str) -> Result<(), EngineError> {
    let name = name.trim().to_string();
    store
        .with_session(id, |session| {
            if !name.is_empty() {
                session.touch(&name, now_ms());
            }
        })
        .ok_or_else(|| EngineError::SessionNotFound(id.to_uppercase()))
}

/// Records one answer outcome and returns the refreshed ranked view and
/// counters. The whole update runs under the session's lock.
pub fn record_answer<S: SessionStore>(
    store: &S,
    id: &str,
    topic: &str,
    outcome: AnswerOutcome,
) -> Result<AnswerAck, EngineError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(EngineError::validation("topic and result are required"));
    }

    store
        .with_session(id, |session| {
            session.record_answer(topic, outcome);
            tracing::debug!(
                session_id = %session.id,
                topic = %topic,
                ?outcome,
                "answer recorded"
            );
            AnswerAck {
                prioritized_topics: session.prioritized_topics.clone(),
                topic_stats: session.topic_stats.clone(),
            }
        })
        .ok_or_else(|| EngineError::SessionNotFound(id.to_uppercase()))
}

/// Stateless pre-session view: topics ranked by collective average
/// confidence, weakest first.
pub fn analyze(topics: &[String], members: &[Member]) -> Result<Vec<TopicAverage>, EngineError> {
    if topics.is_empty() || members.is_empty() {
        return Err(EngineError::validation("topics and members are required"));
    }
    Ok(rank_by_average(topics, members))
}
