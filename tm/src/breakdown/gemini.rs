//! Gemini API client implementation
//!
//! Implements [`BreakdownService`] on the `generateContent` endpoint, asking
//! for a JSON response constrained to `{ "subtasks": [string] }`.

use async_trait::async_trait;
use handlebars::Handlebars;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{BreakdownError, BreakdownService};
use crate::config::BreakdownConfig;

const PROMPT_TEMPLATE: &str = "prompt";

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    hbs: Handlebars<'static>,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in the config and
    /// compiles the prompt template.
    pub fn from_config(config: &BreakdownConfig) -> Result<Self, BreakdownError> {
        debug!(?config, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| BreakdownError::Config(e.to_string()))?;

        Self::new(config, api_key)
    }

    fn new(config: &BreakdownConfig, api_key: String) -> Result<Self, BreakdownError> {
        let mut builder = Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build().map_err(BreakdownError::Network)?;

        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.register_template_string(PROMPT_TEMPLATE, &config.prompt)
            .map_err(|e| BreakdownError::Prompt(e.to_string()))?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            hbs,
        })
    }

    /// Render the prompt for a task title
    fn render_prompt(&self, task_title: &str) -> Result<String, BreakdownError> {
        self.hbs
            .render(PROMPT_TEMPLATE, &serde_json::json!({ "title": task_title }))
            .map_err(|e| BreakdownError::Prompt(e.to_string()))
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        debug!(%self.model, prompt_len = prompt.len(), "build_request_body: called");
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "subtasks": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                        },
                    },
                    "required": ["subtasks"],
                },
            },
        })
    }

    /// Extract the subtask list from a Gemini API response
    fn parse_response(api_response: GeminiResponse) -> Result<Vec<String>, BreakdownError> {
        debug!(candidates = api_response.candidates.len(), "parse_response: called");
        let text: String = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            debug!("parse_response: no text in response");
            return Err(BreakdownError::EmptyResponse);
        }

        let payload: SubtaskPayload = serde_json::from_str(&text)?;
        Ok(payload.subtasks.unwrap_or_default())
    }
}

#[async_trait]
impl BreakdownService for GeminiClient {
    async fn suggest(&self, task_title: &str) -> Result<Vec<String>, BreakdownError> {
        debug!(%self.model, %task_title, "suggest: called");
        let prompt = self.render_prompt(task_title)?;
        let body = self.build_request_body(&prompt);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.clone())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "suggest: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(BreakdownError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        debug!("suggest: success");
        let api_response: GeminiResponse = response.json().await?;
        Self::parse_response(api_response)
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

/// The constrained JSON the model is asked to produce
#[derive(Debug, Deserialize)]
struct SubtaskPayload {
    subtasks: Option<Vec<String>>,
}
