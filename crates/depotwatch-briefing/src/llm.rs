//! Gemini `generateContent` backend.
//!
//! Sends a single user turn and extracts the first candidate's first text
//! part. Non-success statuses, bodies that are not JSON, and JSON without
//! the text path are reported as distinct [`BriefingError`] variants so
//! the caller can log what went wrong.

use std::time::Duration;

use crate::error::BriefingError;

/// Connection settings for the text-generation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// Base API URL (e.g. `https://generativelanguage.googleapis.com/v1beta`).
    pub api_url: String,
    /// Model name placed in the request path.
    pub model: String,
    /// API key sent as the `key` query parameter. May be empty.
    pub api_key: String,
    /// Whole-request timeout.
    pub request_timeout: Duration,
}

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// Create a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BriefingError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, BriefingError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BriefingError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Model name, for logging.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`BriefingError::Transport`], [`BriefingError::Status`],
    /// [`BriefingError::Parse`] or [`BriefingError::MissingText`].
    pub async fn complete(&self, prompt: &str) -> Result<String, BriefingError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|e| BriefingError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(BriefingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BriefingError::Parse(e.to_string()))?;

        extract_candidate_text(&json)
    }
}

/// Build the `generateContent` request body for a single user prompt.
pub fn request_body(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [
            {"role": "user", "parts": [{"text": prompt}]}
        ]
    })
}

/// Extract `candidates[0].content.parts[0].text` from a response.
///
/// # Errors
///
/// Returns [`BriefingError::MissingText`] if any step of the path is absent
/// or the leaf is not a string.
pub fn extract_candidate_text(json: &serde_json::Value) -> Result<String, BriefingError> {
    json.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(BriefingError::MissingText)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = request_body("hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn extract_valid_text() {
        let json = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "- 3 trucks in the last hour"}], "role": "model"}
            }]
        });
        let text = extract_candidate_text(&json);
        assert_eq!(text.ok().as_deref(), Some("- 3 trucks in the last hour"));
    }

    #[test]
    fn extract_missing_candidates() {
        let json = serde_json::json!({"error": {"code": 429}});
        assert!(matches!(
            extract_candidate_text(&json),
            Err(BriefingError::MissingText)
        ));
    }

    #[test]
    fn extract_empty_parts() {
        let json = serde_json::json!({"candidates": [{"content": {"parts": []}}]});
        assert!(extract_candidate_text(&json).is_err());
    }

    #[test]
    fn extract_non_string_text() {
        let json = serde_json::json!({"candidates": [{"content": {"parts": [{"text": 7}]}}]});
        assert!(extract_candidate_text(&json).is_err());
    }

    #[test]
    fn trailing_slash_trimmed() {
        let backend = GeminiBackend::new(&GeminiConfig {
            api_url: "http://localhost:9/v1beta/".to_owned(),
            model: "gemini-2.0-flash".to_owned(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(1),
        });
        assert!(backend.is_ok_and(|b| b.api_url == "http://localhost:9/v1beta"));
    }
}
