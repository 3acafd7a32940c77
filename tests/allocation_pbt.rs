//! Property-based tests for the scorer, allocator, and reallocator:
//! - every allocation respects the 5-minute floor, before and after any
//!   sequence of answer events
//! - time weights over scored topics sum to 1 (zero-sum guard aside)
//! - the critical flag is monotonic once two incorrect answers accumulate

use proptest::prelude::*;
use std::collections::HashMap;

use studysync_engine::allocation::{allocate, MIN_BLOCK_MINUTES};
use studysync_engine::scoring::score_topics;
use studysync_engine::session::Session;
use studysync_engine::types::{AnswerOutcome, Member, SessionSetup};

fn arb_rating() -> impl Strategy<Value = f64> {
    (1u8..=5u8).prop_map(|r| r as f64)
}

fn arb_members(topics: Vec<String>) -> impl Strategy<Value = Vec<Member>> {
    let per_member = proptest::collection::vec(arb_rating(), topics.len());
    proptest::collection::vec(per_member, 1..5).prop_map(move |rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, ratings)| Member {
                name: format!("member{index}"),
                scores: topics
                    .iter()
                    .cloned()
                    .zip(ratings)
                    .collect::<HashMap<String, f64>>(),
            })
            .collect()
    })
}

fn arb_topics() -> impl Strategy<Value = Vec<String>> {
    (1usize..6).prop_map(|n| (0..n).map(|i| format!("topic{i}")).collect())
}

fn arb_outcome() -> impl Strategy<Value = AnswerOutcome> {
    prop_oneof![
        Just(AnswerOutcome::Correct),
        Just(AnswerOutcome::Partial),
        Just(AnswerOutcome::Incorrect),
    ]
}

fn build_session(topics: &[String], members: &[Member], minutes: f64) -> Session {
    let ranked = allocate(score_topics(topics, members), minutes);
    let setup = SessionSetup {
        topics: topics.to_vec(),
        members: members.to_vec(),
        course: None,
        exam_date: None,
        duration_minutes: Some(minutes),
    };
    Session::new("PBT001".to_string(), setup, ranked)
}

proptest! {
    #[test]
    fn prop_time_weights_sum_to_one(
        (topics, members) in arb_topics()
            .prop_flat_map(|t| (Just(t.clone()), arb_members(t)))
    ) {
        let stats = score_topics(&topics, &members);
        let total: f64 = stats.iter().map(|t| t.weakness_score).sum();
        prop_assume!(total > 0.0);

        let weight_sum: f64 = stats.iter().map(|t| t.weakness_score / total).sum();
        prop_assert!((weight_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_initial_allocation_respects_floor(
        (topics, members) in arb_topics()
            .prop_flat_map(|t| (Just(t.clone()), arb_members(t))),
        minutes in 1.0f64..240.0,
    ) {
        let ranked = allocate(score_topics(&topics, &members), minutes);

        prop_assert_eq!(ranked.len(), topics.len());
        for (index, topic) in ranked.iter().enumerate() {
            prop_assert!(topic.allocated_minutes >= MIN_BLOCK_MINUTES);
            prop_assert_eq!(topic.priority, index + 1);
        }
    }

    #[test]
    fn prop_floor_survives_any_answer_sequence(
        (topics, members) in arb_topics()
            .prop_flat_map(|t| (Just(t.clone()), arb_members(t))),
        events in proptest::collection::vec((0usize..6, arb_outcome()), 0..25),
    ) {
        let mut session = build_session(&topics, &members, 60.0);

        for (topic_index, outcome) in events {
            let topic = &topics[topic_index % topics.len()];
            session.record_answer(topic, outcome);
        }

        for record in session.topic_stats.values() {
            prop_assert!(record.allocated_minutes >= MIN_BLOCK_MINUTES);
        }
        let mut priorities: Vec<usize> =
            session.prioritized_topics.iter().map(|t| t.priority).collect();
        priorities.sort();
        let expected: Vec<usize> = (1..=session.prioritized_topics.len()).collect();
        prop_assert_eq!(priorities, expected);
    }

    #[test]
    fn prop_critical_is_monotonic(
        (topics, members) in arb_topics()
            .prop_flat_map(|t| (Just(t.clone()), arb_members(t))),
        events in proptest::collection::vec((0usize..6, arb_outcome()), 1..30),
    ) {
        let mut session = build_session(&topics, &members, 60.0);
        let mut seen_critical: HashMap<String, bool> = HashMap::new();

        for (topic_index, outcome) in events {
            let topic = topics[topic_index % topics.len()].clone();
            session.record_answer(&topic, outcome);

            for (name, record) in &session.topic_stats {
                let was = seen_critical.entry(name.clone()).or_insert(false);
                // Never flips back once set.
                prop_assert!(record.critical || !*was);
                *was = record.critical;
            }
        }

        // A critical topic must have accumulated at least two misses.
        for record in session.topic_stats.values() {
            if record.critical {
                prop_assert!(record.incorrect_count >= 2);
            }
        }
    }
}
