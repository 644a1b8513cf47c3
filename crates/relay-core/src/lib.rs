//! The prompt relay: read a prompt, forward it to the generation service,
//! hand back the text or a warning.
//!
//! - `RelayConfig` / `Credential`: startup configuration
//! - `TextGenerator`: the external service seam, with `LlmGenerator` as the
//!   Gemini-backed implementation
//! - `PromptRelay`: the submission handler

mod config;
mod generator;
mod relay;

pub use config::{RelayConfig, API_KEY_VARS, DEFAULT_SECRETS_PATH, SECRETS_PATH_ENV};
pub use generator::{Generation, LlmGenerator, TextGenerator};
pub use relay::{Outcome, PromptRelay, EMPTY_PROMPT_WARNING};
pub use relay_types::{Credential, DisplayOptions, RelayError, Result};
