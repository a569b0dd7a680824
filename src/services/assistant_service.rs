use crate::error::{AppError, AppResult};
use crate::external::AssistantClient;
use crate::models::{AssistantRequest, AssistantResponse};

const MAX_PROMPT_CHARS: usize = 4000;
const MAX_CONTEXT_CHARS: usize = 12000;

#[derive(Clone)]
pub struct AssistantService {
    client: AssistantClient,
}

impl AssistantService {
    pub fn new(client: AssistantClient) -> Self {
        Self { client }
    }

    pub async fn ask(&self, user_id: i64, request: AssistantRequest) -> AppResult<AssistantResponse> {
        if !self.client.is_enabled() {
            return Err(AppError::BusinessRule(
                "The assistant is not configured".into(),
            ));
        }

        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::ValidationError("prompt is required".into()));
        }
        if prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(AppError::ValidationError(format!(
                "prompt must be at most {MAX_PROMPT_CHARS} characters"
            )));
        }
        let context = request
            .context
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        if context.is_some_and(|c| c.chars().count() > MAX_CONTEXT_CHARS) {
            return Err(AppError::ValidationError(format!(
                "context must be at most {MAX_CONTEXT_CHARS} characters"
            )));
        }

        match self.client.complete(prompt, context).await {
            Ok(reply) => {
                log::info!("Assistant answered user {} ({} chars)", user_id, reply.len());
                Ok(AssistantResponse { reply })
            }
            Err(e) => {
                log::error!("Assistant request from user {} failed: {}", user_id, e);
                Err(AppError::ExternalApiError(
                    "The assistant is unavailable right now".into(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssistantConfig;

    fn request(prompt: &str) -> AssistantRequest {
        AssistantRequest {
            prompt: prompt.into(),
            context: None,
        }
    }

    #[tokio::test]
    async fn test_disabled_without_key() {
        let svc = AssistantService::new(AssistantClient::new(AssistantConfig::default()));
        assert!(matches!(
            svc.ask(1, request("hello")).await,
            Err(AppError::BusinessRule(_))
        ));
    }

    #[tokio::test]
    async fn test_prompt_validation() {
        let svc = AssistantService::new(AssistantClient::new(AssistantConfig {
            api_key: "sk-test".into(),
            ..AssistantConfig::default()
        }));
        assert!(matches!(
            svc.ask(1, request("   ")).await,
            Err(AppError::ValidationError(_))
        ));
        let long = "x".repeat(MAX_PROMPT_CHARS + 1);
        assert!(matches!(
            svc.ask(1, request(&long)).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generic() {
        let svc = AssistantService::new(AssistantClient::new(AssistantConfig {
            base_url: "http://127.0.0.1:9".into(),
            api_key: "sk-test".into(),
            timeout_secs: 2,
            ..AssistantConfig::default()
        }));
        match svc.ask(1, request("hello")).await {
            Err(AppError::ExternalApiError(msg)) => assert!(!msg.contains("127.0.0.1")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
