use thiserror::Error;

/// Failure classes surfaced by the engine. Validation errors reject the
/// request before any state is touched; not-found means the session id is
/// unknown. Degenerate inputs (zero weakness sum, no eligible donor) are
/// handled by fallbacks and never reach this enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("session {0} not found")]
    SessionNotFound(String),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }
}
