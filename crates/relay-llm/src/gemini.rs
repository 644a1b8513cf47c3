use std::fmt;

use async_trait::async_trait;
use serde_json::json;

use crate::{FinishReason, Message, ProviderAdapter, Request, Response, Role, Usage};
use relay_types::{Credential, RelayError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

// ---------------------------------------------------------------------------
// GeminiAdapter
// ---------------------------------------------------------------------------

pub struct GeminiAdapter {
    api_key: Credential,
    client: reqwest::Client,
    base_url: String,
    default_model: String,
}

impl fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl GeminiAdapter {
    pub fn new(api_key: Credential) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    fn build_request_body(&self, request: &Request) -> serde_json::Value {
        // System messages go into systemInstruction, everything else into contents
        let system_parts: Vec<serde_json::Value> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| json!({ "text": m.text }))
            .collect();

        let contents: Vec<serde_json::Value> = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(convert_message)
            .collect();

        let mut body = json!({
            "contents": contents,
        });

        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({ "parts": system_parts });
        }

        if let Some(temp) = request.temperature {
            body["generationConfig"] = json!({ "temperature": temp });
        }

        body
    }

    /// `status` is the HTTP status of the (successful) reply and is carried
    /// into any error raised here.
    fn parse_response(
        &self,
        json: serde_json::Value,
        status: u16,
    ) -> Result<Response, RelayError> {
        let candidates = json["candidates"]
            .as_array()
            .ok_or_else(|| RelayError::ProviderError {
                provider: "google".into(),
                status,
                message: "Missing candidates in response".into(),
                retryable: false,
            })?;

        let candidate = candidates.first().ok_or_else(|| RelayError::ProviderError {
            provider: "google".into(),
            status,
            message: "Empty candidates array".into(),
            retryable: false,
        })?;

        let raw_reason = candidate["finishReason"].as_str();
        let finish_reason = match raw_reason {
            Some("MAX_TOKENS") => FinishReason::MaxTokens,
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => FinishReason::Safety,
            _ => FinishReason::EndTurn,
        };

        // A blocked candidate comes back without content parts.
        let parts: Vec<&str> = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();
        if parts.is_empty() {
            return Err(RelayError::ProviderError {
                provider: "google".into(),
                status,
                message: format!(
                    "no text in response (finishReason={})",
                    raw_reason.unwrap_or("unknown")
                ),
                retryable: false,
            });
        }
        let text = parts.concat();

        let usage_meta = &json["usageMetadata"];
        let input_tokens = usage_meta["promptTokenCount"].as_u64().unwrap_or(0);
        let output_tokens = usage_meta["candidatesTokenCount"].as_u64().unwrap_or(0);
        let total_tokens = usage_meta["totalTokenCount"]
            .as_u64()
            .unwrap_or(input_tokens + output_tokens);

        Ok(Response {
            id: json["responseId"]
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            text,
            usage: Usage {
                input_tokens,
                output_tokens,
                total_tokens,
            },
            model: json["modelVersion"].as_str().unwrap_or_default().to_string(),
            finish_reason,
        })
    }
}

// ---------------------------------------------------------------------------
// Message conversion
// ---------------------------------------------------------------------------

fn convert_message(msg: &Message) -> serde_json::Value {
    json!({
        "role": "user",
        "parts": [{ "text": msg.text }]
    })
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn map_error(status: reqwest::StatusCode, body: &str) -> RelayError {
    let status_u16 = status.as_u16();
    match status_u16 {
        429 => RelayError::RateLimited {
            provider: "google".into(),
            retry_after_ms: 1000,
        },
        401 | 403 => RelayError::AuthError {
            provider: "google".into(),
        },
        500 | 503 => RelayError::ProviderError {
            provider: "google".into(),
            status: status_u16,
            message: extract_error_message(body),
            retryable: true,
        },
        _ => RelayError::ProviderError {
            provider: "google".into(),
            status: status_u16,
            message: extract_error_message(body),
            retryable: false,
        },
    }
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

// ---------------------------------------------------------------------------
// ProviderAdapter implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    async fn complete(&self, request: &Request) -> Result<Response, RelayError> {
        let body = self.build_request_body(request);
        let model = if request.model.is_empty() {
            &self.default_model
        } else {
            &request.model
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose())])
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::ProviderError {
                provider: "google".into(),
                status: 0,
                message: e.without_url().to_string(),
                retryable: true,
            })?;

        let status = resp.status();
        let response_body = resp.text().await.map_err(|e| RelayError::ProviderError {
            provider: "google".into(),
            status: 0,
            message: e.without_url().to_string(),
            retryable: true,
        })?;

        if !status.is_success() {
            return Err(map_error(status, &response_body));
        }

        let json: serde_json::Value =
            serde_json::from_str(&response_body).map_err(|e| RelayError::ProviderError {
                provider: "google".into(),
                status: status.as_u16(),
                message: format!("Failed to parse response JSON: {e}"),
                retryable: false,
            })?;

        let mut response = self.parse_response(json, status.as_u16())?;
        if response.model.is_empty() {
            response.model = model.to_string();
        }
        Ok(response)
    }

    fn name(&self) -> &str {
        "google"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
