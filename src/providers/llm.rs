//! OpenRouter chat-completion client used for chart interpretation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::Interpreter;
use crate::error::{ApiError, Result};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Placeholder shipped in sample env files.
const PLACEHOLDER_KEY: &str = "YOUR_OPENROUTER_KEY";

const SYSTEM_PROMPT: &str = "You are a professional astrology consultant who answers in Turkish. \
Never use the words 'planet' or 'zodiac sign' and avoid technical astrological terms. \
Speak plainly and personally ('your Sun', 'your Moon', 'your Venus'). \
Give detailed, sincere and empathetic readings focused on personality, relationships and career.";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;

// == Wire Types ==
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

// == Interpreter ==
#[derive(Debug, Clone)]
pub struct OpenRouterInterpreter {
    client: Client,
    api_key: Option<String>,
    model: String,
    app_url: String,
    app_name: String,
    timeout: Duration,
}

impl OpenRouterInterpreter {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        model: impl Into<String>,
        app_url: impl Into<String>,
        app_name: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
            app_url: app_url.into(),
            app_name: app_name.into(),
            timeout,
        }
    }

    fn api_key(&self) -> Result<&str> {
        usable_key(self.api_key.as_deref()).ok_or_else(|| {
            ApiError::NotConfigured("interpretation requires a valid OPENROUTER_API_KEY".to_string())
        })
    }
}

#[async_trait]
impl Interpreter for OpenRouterInterpreter {
    async fn interpret(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!(model = %self.model, "requesting interpretation from OpenRouter");

        let response = self
            .client
            .post(OPENROUTER_URL)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.app_url)
            .header("X-Title", &self.app_name)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "OpenRouter API error");
            return Err(ApiError::Upstream(format!(
                "OpenRouter responded with status {}",
                status
            )));
        }

        extract_content(response.json().await?)
    }
}

/// Returns the key unless it is blank or the sample placeholder.
fn usable_key(key: Option<&str>) -> Option<&str> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && *k != PLACEHOLDER_KEY)
}

/// First non-empty message content of a completion.
fn extract_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            error!("empty interpretation from OpenRouter");
            ApiError::Internal("the language model returned an empty interpretation".to_string())
        })
}
