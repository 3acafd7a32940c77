//! Session registry. One mutex per session serializes all mutations to that
//! session (the donor-selection read-then-write must be atomic); independent
//! sessions are mutated in parallel. The registry lock is held only for
//! lookup and insert, never across a session mutation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::Rng;

use crate::config::EngineConfig;
use crate::session::Session;
use crate::types::{PrioritizedTopic, SessionSetup};

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Storage seam for live sessions: create, plus closure-based
/// mutate-under-lock access. Backings other than the in-memory map can be
/// swapped in without touching the reallocation logic.
pub trait SessionStore: Send + Sync {
    fn config(&self) -> &EngineConfig;

    /// Creates a session with a fresh unique identifier and returns the id.
    fn create(&self, setup: SessionSetup, topics: Vec<PrioritizedTopic>) -> String;

    /// Runs `f` with exclusive access to the session, or returns `None` for
    /// an unknown id. Lookup is case-insensitive (ids normalize to
    /// uppercase).
    fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R>
    where
        Self: Sized;
}

/// Process-lifetime in-memory store. Sessions live until the process exits;
/// there is no deletion or expiry path.
pub struct InMemorySessionStore {
    config: EngineConfig,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl InMemorySessionStore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    fn generate_id(&self) -> String {
        let mut rng = rand::rng();
        (0..self.config.session_id_length)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SessionStore for InMemorySessionStore {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn create(&self, setup: SessionSetup, topics: Vec<PrioritizedTopic>) -> String {
        let mut sessions = self.sessions.write();
        // Regenerate on collision; the id space is widened via config if a
        // deployment ever gets big enough to care.
        let id = loop {
            let candidate = self.generate_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = Session::new(id.clone(), setup, topics);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));

        tracing::info!(session_id = %id, "session created");
        id
    }

    fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let key = id.to_uppercase();
        let session = self.sessions.read().get(&key).cloned()?;
        let mut guard = session.lock();
        Some(f(&mut guard))
    }
}
