use serde::{Deserialize, Serialize};

use crate::core::config::GenerationConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Apply the configured sampling knobs. Unset knobs stay at the
    /// provider's own defaults.
    pub fn with_generation(mut self, generation: &GenerationConfig) -> Self {
        self.temperature = generation.temperature;
        self.max_tokens = generation.max_tokens;
        self
    }
}
