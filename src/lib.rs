pub mod allocation;
pub mod config;
pub mod engine;
pub mod error;
pub mod scoring;
pub mod session;
pub mod store;
pub mod types;

pub use config::EngineConfig;
pub use error::EngineError;
pub use store::{InMemorySessionStore, SessionStore};
pub use types::{AnswerOutcome, Member, SessionSetup};
