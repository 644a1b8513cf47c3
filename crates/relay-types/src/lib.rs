//! Shared types and errors for the prompt relay.
//!
//! This crate provides the foundational types used across the other relay crates:
//! - `RelayError`: unified error taxonomy
//! - `Credential`: the API key, redacted in output and zeroized on drop
//! - `DisplayOptions`: presentation settings for the single relay page
//!
//! Everything here is wasm-safe (no async runtime, no I/O), so the web
//! front-end compiles it for both the server and the browser.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Unified error type for all relay subsystems.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    // === LLM Provider Errors ===
    #[error("Provider {provider} returned HTTP {status}: {message}")]
    ProviderError {
        provider: String,
        status: u16,
        message: String,
        retryable: bool,
    },

    #[error("Rate limited by {provider}, retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    #[error("Authentication failed for provider {provider}")]
    AuthError { provider: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    // === Generic ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl RelayError {
    /// Returns `true` if the error is transient and the call may succeed if the
    /// user submits again. Nothing in the relay retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RelayError::RateLimited { .. } | RelayError::ProviderError { retryable: true, .. }
        )
    }

    /// Maps the error to an HTTP status code, if it has a natural one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            RelayError::RateLimited { .. } => Some(429),
            RelayError::AuthError { .. } => Some(401),
            RelayError::ProviderError { status, .. } if *status != 0 => Some(*status),
            _ => None,
        }
    }
}

/// A convenience alias for `Result<T, RelayError>`.
pub type Result<T> = std::result::Result<T, RelayError>;

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// An API key that never shows up in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    inner: String,
}

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self { inner: key.into() }
    }

    /// The raw key. Only call this when handing the key to the provider.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential([REDACTED])")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// ---------------------------------------------------------------------------
// DisplayOptions
// ---------------------------------------------------------------------------

pub const DEFAULT_TITLE: &str = "Gemini App";
pub const DEFAULT_HEADING: &str = "Gemini AI App";
pub const DEFAULT_SUBTITLE: &str = "Ask Google Gemini anything.";
pub const DEFAULT_ICON: &str = "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🤖</text></svg>";

/// Presentation settings for the relay page.
///
/// The plain and the "success" flavours of the page are the same component;
/// these flags select between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default)]
    pub show_subtitle: bool,
    #[serde(default)]
    pub success_style: bool,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_heading")]
    pub heading: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_heading() -> String {
    DEFAULT_HEADING.to_string()
}

fn default_subtitle() -> String {
    DEFAULT_SUBTITLE.to_string()
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_subtitle: false,
            success_style: false,
            title: default_title(),
            heading: default_heading(),
            subtitle: default_subtitle(),
            icon: default_icon(),
        }
    }
}

impl DisplayOptions {
    /// CSS class for the area that shows generated text.
    pub fn output_class(&self) -> &'static str {
        if self.success_style {
            "output output-success"
        } else {
            "output"
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
