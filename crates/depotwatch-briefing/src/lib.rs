//! Text-generation briefings for the Depotwatch yard dashboard.
//!
//! On demand, the dashboard's chart series or event log are rendered
//! into a prompt, sent to a Gemini-compatible `generateContent`
//! endpoint, and the returned text is shown in the briefing panel.
//!
//! # Architecture
//!
//! ```text
//! chart series / log lines --> PromptEngine --> GeminiBackend --> BriefingPanel
//! ```
//!
//! Any failure collapses to a fixed apology on screen; the specific cause
//! is logged. There are no retries.

pub mod client;
pub mod error;
pub mod llm;
pub mod prompt;

pub use client::{APOLOGY, BriefingClient, BriefingOutcome, NOT_ENOUGH_DATA};
pub use error::BriefingError;
pub use llm::{GeminiBackend, GeminiConfig};
pub use prompt::PromptEngine;
