//! LLM client for the prompt relay.
//!
//! Provides the `ProviderAdapter` trait, the `DynProvider` wrapper, a
//! middleware chain, the Gemini adapter, and `LlmClient` for routing requests
//! to a registered provider.

mod client;
mod gemini;
mod provider;
mod types;

pub use client::*;
pub use gemini::{GeminiAdapter, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use provider::*;
pub use types::*;
