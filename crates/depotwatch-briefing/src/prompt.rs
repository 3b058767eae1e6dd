//! Prompt rendering via `minijinja`.
//!
//! Both prompts are compiled into the binary. The chart series and log
//! lines are joined in Rust and handed to the templates as plain strings.

use minijinja::{Environment, context};

use crate::error::BriefingError;

const BRIEFING_TEMPLATE: &str = "You are a helpful assistant. Summarize this warehouse data in simple points for a shift manager:\nGoods data: {{ goods }}\nVehicle data: {{ vehicles }}";

const ANOMALY_TEMPLATE: &str = "Review this event log. Are there any potential problems or things to watch out for? Be brief.\n---\n{{ log_text }}\n---";

/// Holds the compiled prompt templates.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Compile the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`BriefingError::Template`] if a template fails to compile.
    pub fn new() -> Result<Self, BriefingError> {
        let mut env = Environment::new();
        env.add_template("briefing", BRIEFING_TEMPLATE)
            .map_err(|e| BriefingError::Template(format!("failed to add briefing template: {e}")))?;
        env.add_template("anomaly_review", ANOMALY_TEMPLATE)
            .map_err(|e| {
                BriefingError::Template(format!("failed to add anomaly template: {e}"))
            })?;
        Ok(Self { env })
    }

    /// Shift-manager summary prompt over both chart series.
    ///
    /// # Errors
    ///
    /// Returns [`BriefingError::Template`] if rendering fails.
    pub fn briefing(&self, goods: &[u64], vehicles: &[u64]) -> Result<String, BriefingError> {
        self.env
            .get_template("briefing")
            .map_err(|e| BriefingError::Template(format!("missing briefing template: {e}")))?
            .render(context! {
                goods => join_values(goods),
                vehicles => join_values(vehicles),
            })
            .map_err(|e| BriefingError::Template(format!("briefing render failed: {e}")))
    }

    /// Problem-spotting prompt over the event log, lines in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`BriefingError::Template`] if rendering fails.
    pub fn anomaly_review(&self, log_lines: &[String]) -> Result<String, BriefingError> {
        self.env
            .get_template("anomaly_review")
            .map_err(|e| BriefingError::Template(format!("missing anomaly template: {e}")))?
            .render(context! { log_text => log_lines.join("\n") })
            .map_err(|e| BriefingError::Template(format!("anomaly render failed: {e}")))
    }
}

/// Comma-join a series the way the chart data is quoted in prompts.
fn join_values(values: &[u64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
