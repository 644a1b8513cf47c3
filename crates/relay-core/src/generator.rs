use async_trait::async_trait;

use relay_llm::{GeminiAdapter, LlmClient, LoggingMiddleware, Message, Request};
use relay_types::Result;

use crate::RelayConfig;

/// Text returned by the generation service for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
}

/// The external text-generation service: one prompt in, one text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation>;
}

// ---------------------------------------------------------------------------
// LlmGenerator
// ---------------------------------------------------------------------------

/// `TextGenerator` backed by an `LlmClient`.
pub struct LlmGenerator {
    client: LlmClient,
    system_instruction: Option<String>,
    temperature: Option<f32>,
}

impl LlmGenerator {
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            system_instruction: None,
            temperature: None,
        }
    }

    /// Gemini client with request logging, configured from `config`.
    pub fn from_config(config: &RelayConfig) -> Self {
        let mut adapter =
            GeminiAdapter::new(config.credential.clone()).with_model(config.model.clone());
        if let Some(ref url) = config.base_url {
            adapter = adapter.with_base_url(url.clone());
        }

        let client = LlmClient::new(adapter).with_middleware(LoggingMiddleware);
        tracing::debug!(provider = client.provider_name(), "text generator ready");

        Self {
            client,
            system_instruction: config.system_instruction.clone(),
            temperature: config.temperature,
        }
    }

    fn build_request(&self, prompt: &str) -> Request {
        let mut request = Request::prompt(prompt);
        if let Some(ref instruction) = self.system_instruction {
            request.messages.insert(0, Message::system(instruction.clone()));
        }
        request.temperature = self.temperature;
        request
    }
}

#[async_trait]
impl TextGenerator for LlmGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        let response = self.client.complete(&self.build_request(prompt)).await?;
        Ok(Generation {
            text: response.text,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Credential;
    use relay_llm::Role;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> RelayConfig {
        let mut config = RelayConfig::new(Credential::new("test-key"));
        config.base_url = Some(server.uri());
        config
    }

    #[test]
    fn build_request_adds_system_instruction_and_temperature() {
        let mut config = RelayConfig::new(Credential::new("k"));
        config.system_instruction = Some("You are a pastry chef.".into());
        config.temperature = Some(0.7);
        let generator = LlmGenerator::from_config(&config);

        let request = generator.build_request("Cake ideas");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].text, "Cake ideas");
        assert_eq!(request.temperature, Some(0.7));
    }

    #[test]
    fn build_request_passes_prompt_verbatim() {
        let generator = LlmGenerator::from_config(&RelayConfig::new(Credential::new("k")));
        let request = generator.build_request("  spaced prompt \n");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].text, "  spaced prompt \n");
        assert!(request.temperature.is_none());
    }

    #[tokio::test]
    async fn generate_calls_gemini() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "Hello" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Hi there!" }], "role": "model" },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = LlmGenerator::from_config(&config_for(&server));
        let generation = generator.generate("Hello").await.unwrap();
        assert_eq!(generation.text, "Hi there!");
    }

    #[tokio::test]
    async fn generate_propagates_service_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "code": 429, "message": "Resource has been exhausted" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = LlmGenerator::from_config(&config_for(&server));
        let err = generator.generate("Explain gravity").await.unwrap_err();
        assert!(matches!(err, relay_types::RelayError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn generate_fails_when_reply_has_no_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "candidates": [{ "finishReason": "SAFETY" }] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let generator = LlmGenerator::from_config(&config_for(&server));
        let err = generator.generate("Explain gravity").await.unwrap_err();
        assert!(matches!(
            err,
            relay_types::RelayError::ProviderError { status: 200, retryable: false, .. }
        ));
    }
}
