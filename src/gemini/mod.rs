use crate::event::AppEvent;
use serde_json::{json, Value};
use std::sync::mpsc;
use thiserror::Error;
use tokio::runtime::Handle;

pub mod response;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub model: String,
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("gemini request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gemini returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("gemini response is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("gemini error: {0}")]
    Api(String),
    #[error("gemini response carried no text (keys: {keys})")]
    NoText { keys: String },
}

pub fn build_prompt(feedback: &str) -> String {
    format!(
        "Interpret this user feedback for a desktop UI: '{feedback}'. \
         The UI has a button, a title, a background, a text area and a slider. \
         Respond as a JSON list of objects, each with fields: component, property, value. \
         Example: [{{\"component\": \"button\", \"property\": \"color\", \"value\": \"red\"}}, ...]"
    )
}

pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "component": { "type": "STRING" },
                "property": { "type": "STRING" },
                "value": {
                    "anyOf": [
                        { "type": "STRING" },
                        { "type": "INTEGER" },
                        { "type": "NUMBER" },
                        { "type": "BOOLEAN" }
                    ],
                    "nullable": true
                }
            },
            "required": ["component", "property"]
        }
    })
}

pub fn request_body(feedback: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": build_prompt(feedback) } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

fn summarize(body: &str, limit: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(limit).collect();
    out.push_str("...");
    out
}

/// Sends feedback to Gemini on the tokio runtime and reports back to the UI
/// thread through the app event channel.
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, tx: mpsc::Sender<AppEvent>, runtime_handle: Handle) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            tx,
            runtime_handle,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn fetch_instructions(
        &self,
        feedback: &str,
        api_key: &str,
    ) -> Result<Vec<Value>, FetchError> {
        let url = self.config.generate_url();
        tracing::info!(model = %self.config.model, "sending feedback to gemini");

        let http = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(feedback))
            .send()
            .await?;
        let status = http.status();
        let body_text = http.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: summarize(&body_text, 300),
            });
        }

        let body: Value = serde_json::from_str(&body_text)?;
        response::instructions_from_response(&body)
    }

    pub fn send(&self, feedback: String, api_key: String) {
        let client = self.clone();
        self.runtime_handle.spawn(async move {
            let event = match client.fetch_instructions(&feedback, &api_key).await {
                Ok(items) => AppEvent::InstructionsReceived { feedback, items },
                Err(err) => {
                    tracing::error!("gemini request failed: {err}");
                    AppEvent::FetchFailed(err.to_string())
                }
            };
            if client.tx.send(event).is_err() {
                tracing::warn!("app event channel closed before gemini response arrived");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_embeds_feedback_and_constrains_output() {
        let body = request_body("make the button red");
        let prompt = body["contents"][0]["parts"][0]["text"]
            .as_str()
            .expect("prompt text should be present");
        assert!(prompt.contains("'make the button red'"));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let schema = &body["generationConfig"]["responseSchema"];
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(
            schema["items"]["required"],
            serde_json::json!(["component", "property"])
        );
        assert!(schema["items"]["properties"]["value"]["anyOf"].is_array());
    }

    #[test]
    fn generate_url_joins_endpoint_and_model() {
        let config = GeminiConfig {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "http://localhost:8080/v1beta/".to_string(),
        };
        assert_eq!(
            config.generate_url(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            GeminiConfig::default().generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn summarize_truncates_long_bodies() {
        assert_eq!(summarize("  short  ", 10), "short");
        assert_eq!(summarize("abcdefghijkl", 4), "abcd...");
    }
}
