use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single text turn. The relay only ever sends one user turn, optionally
/// preceded by a system instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Empty means "use the provider's default model".
    #[serde(default)]
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
}

impl Request {
    /// A request carrying a single user message and nothing else.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            model: String::new(),
            messages: vec![Message::user(text)],
            temperature: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: String,
    pub text: String,
    pub usage: Usage,
    pub model: String,
    pub finish_reason: FinishReason,
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

// ---------------------------------------------------------------------------
// FinishReason
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    EndTurn,
    MaxTokens,
    Safety,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
