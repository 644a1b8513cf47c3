use relay_types::{DisplayOptions, Result};
use tracing::{debug, info};

use crate::{LlmGenerator, RelayConfig, TextGenerator};

/// Shown instead of calling the service when the prompt is blank.
pub const EMPTY_PROMPT_WARNING: &str = "Please enter a prompt";

/// What one submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The prompt was blank; nothing was sent.
    Warning(String),
    /// The service's text, unmodified.
    Generated(String),
}

impl Outcome {
    pub fn text(&self) -> &str {
        match self {
            Outcome::Warning(text) | Outcome::Generated(text) => text,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Outcome::Generated(_))
    }
}

/// The single prompt handler: validate, forward, return the reply.
///
/// Holds no per-interaction state, so one instance is shared across all
/// requests.
pub struct PromptRelay {
    generator: Box<dyn TextGenerator>,
    display: DisplayOptions,
}

impl PromptRelay {
    pub fn new(generator: impl TextGenerator + 'static, display: DisplayOptions) -> Self {
        Self {
            generator: Box::new(generator),
            display,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        info!(model = %config.model, "configuring Gemini relay");
        Self::new(LlmGenerator::from_config(config), config.display.clone())
    }

    pub fn display(&self) -> &DisplayOptions {
        &self.display
    }

    /// Handle one click of the trigger.
    ///
    /// A blank prompt yields a warning without contacting the service.
    /// Otherwise the prompt is sent exactly once, as-is; service failures are
    /// returned to the caller untouched.
    pub async fn submit(&self, prompt: &str) -> Result<Outcome> {
        if prompt.trim().is_empty() {
            debug!("blank prompt, not calling the generation service");
            return Ok(Outcome::Warning(EMPTY_PROMPT_WARNING.to_string()));
        }

        info!(prompt_len = prompt.len(), "forwarding prompt");
        let generation = self.generator.generate(prompt).await?;
        info!(response_len = generation.text.len(), "generation complete");
        Ok(Outcome::Generated(generation.text))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
