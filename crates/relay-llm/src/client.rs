use relay_types::RelayError;

use crate::{DynProvider, ProviderAdapter, Request, Response};

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

pub trait Middleware: Send + Sync {
    fn before(&self, _request: &mut Request) {}
    fn after(&self, _request: &Request, _response: &mut Response) {}
}

// ---------------------------------------------------------------------------
// Built-in middleware: LoggingMiddleware
// ---------------------------------------------------------------------------

pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn before(&self, request: &mut Request) {
        tracing::info!(
            model = %request.model,
            messages = request.messages.len(),
            "LLM request"
        );
    }

    fn after(&self, _request: &Request, response: &mut Response) {
        tracing::info!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            finish = ?response.finish_reason,
            "LLM response"
        );
    }
}

// ---------------------------------------------------------------------------
// LlmClient
// ---------------------------------------------------------------------------

/// One provider plus the middleware chain wrapped around every call.
pub struct LlmClient {
    provider: DynProvider,
    middleware: Vec<Box<dyn Middleware>>,
}

impl LlmClient {
    pub fn new(provider: impl ProviderAdapter + 'static) -> Self {
        Self {
            provider: DynProvider::new(provider),
            middleware: Vec::new(),
        }
    }

    pub fn with_middleware(mut self, m: impl Middleware + 'static) -> Self {
        self.middleware.push(Box::new(m));
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn complete(&self, request: &Request) -> Result<Response, RelayError> {
        let mut req = request.clone();
        if req.model.is_empty() {
            req.model = self.provider.default_model().to_string();
        }

        for m in &self.middleware {
            m.before(&mut req);
        }

        let mut resp = self.provider.complete(&req).await?;

        for m in &self.middleware {
            m.after(&req, &mut resp);
        }

        Ok(resp)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
