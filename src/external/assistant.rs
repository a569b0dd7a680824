use crate::config::AssistantConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str =
    "You are the assistant of an event management dashboard. Answer concisely.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct AssistantClient {
    http: Client,
    cfg: AssistantConfig,
}

impl AssistantClient {
    pub fn new(cfg: AssistantConfig) -> Self {
        let http = Client::builder()
            .user_agent("eventhub-backend/assistant")
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http, cfg }
    }

    pub fn is_enabled(&self) -> bool {
        !self.cfg.api_key.is_empty()
    }

    pub async fn complete(&self, prompt: &str, context: Option<&str>) -> AppResult<String> {
        if !self.is_enabled() {
            return Err(AppError::ConfigError("Assistant is not configured".into()));
        }

        let mut messages = vec![ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT,
        }];
        if let Some(ctx) = context {
            messages.push(ChatMessage {
                role: "user",
                content: ctx,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let url = format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        );
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.cfg.api_key)
            .json(&ChatRequest {
                model: &self.cfg.model,
                messages,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            log::error!("Assistant API error: HTTP {}: {}", status.as_u16(), text);
            return Err(AppError::ExternalApiError(format!(
                "Assistant API returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: ChatResponse = resp.json().await?;
        body.choices
            .into_iter()
            .find_map(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ExternalApiError("Assistant returned no answer".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_key() {
        assert!(!AssistantClient::new(AssistantConfig::default()).is_enabled());
    }

    #[test]
    fn test_parses_first_choice() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":" Hello "}}]}"#,
        )
        .unwrap();
        assert_eq!(body.choices[0].message.content.as_deref(), Some(" Hello "));
    }
}
