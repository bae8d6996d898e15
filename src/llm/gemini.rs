use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};

use crate::{
    config,
    llm::{Generator, ModelError},
    utils,
};

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_url: String, api_key: String, model: String) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    /// Client configured from `GEMINI_API_URL`, `GEMINI_API_KEY` and
    /// `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self, ModelError> {
        Self::new(
            config::gemini_api_url(),
            config::gemini_api_key(),
            config::gemini_model(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!(
            "{base}/models/{model}:generateContent",
            base = self.api_url,
            model = self.model
        );
        let request = json!({
            "contents": [ { "role": "user", "parts": [ { "text": prompt } ] } ]
        });

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                message: utils::truncate(&body, 300),
            });
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| ModelError::Decode(e.to_string()))?;
        response_text(&value)
    }
}

/// Joins the text parts of the first candidate.
pub fn response_text(response: &Value) -> Result<String, ModelError> {
    if let Some(error) = response.get("error") {
        return Err(ModelError::Api(utils::truncate(&error.to_string(), 300)));
    }

    let text = response["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    Ok(text)
}
