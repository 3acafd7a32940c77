#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Length of generated session identifiers (uppercase alphanumeric).
    pub session_id_length: usize,
    /// Session duration used when the setup input omits `duration_minutes`.
    pub default_duration_minutes: f64,
    /// A member is online while `now - last_heartbeat` is below this window.
    pub presence_window_ms: i64,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let session_id_length = std::env::var("STUDYSYNC_SESSION_ID_LENGTH")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|len| *len > 0)
            .unwrap_or(6);

        let default_duration_minutes = std::env::var("STUDYSYNC_DEFAULT_MINUTES")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|minutes| *minutes > 0.0)
            .unwrap_or(60.0);

        let presence_window_ms = std::env::var("STUDYSYNC_PRESENCE_WINDOW_MS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|window| *window > 0)
            .unwrap_or(8_000);

        Self {
            session_id_length,
            default_duration_minutes,
            presence_window_ms,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_id_length: 6,
            default_duration_minutes: 60.0,
            presence_window_ms: 8_000,
        }
    }
}
