//! Error types for the briefing client.
//!
//! Every variant ends up as the same apology on screen. The distinction
//! only exists so the cause can be logged.

/// Errors that can occur while requesting generated text.
#[derive(Debug, thiserror::Error)]
pub enum BriefingError {
    /// The request never completed (DNS, connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("response parse error: {0}")]
    Parse(String),

    /// The response JSON had no `candidates[0].content.parts[0].text`.
    #[error("response missing candidates[0].content.parts[0].text")]
    MissingText,

    /// A prompt template failed to load or render.
    #[error("template error: {0}")]
    Template(String),

    /// The HTTP client could not be built.
    #[error("config error: {0}")]
    Config(String),
}

impl BriefingError {
    /// Short machine-friendly cause label for structured logs.
    pub const fn cause(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Parse(_) => "parse",
            Self::MissingText => "missing_text",
            Self::Template(_) => "template",
            Self::Config(_) => "config",
        }
    }
}
