//! Model access: a provider trait over local or remote HTTP model servers.
//!
//! Two implementations are provided:
//! - `OllamaProvider`: Ollama's native API
//! - `OpenAiCompatProvider`: any OpenAI-compatible endpoint (LM Studio,
//!   remote keyed APIs)

pub mod ollama;
pub mod openai;
pub mod provider;
pub mod types;

use std::sync::Arc;

use crate::core::config::{ProviderConfig, ProviderKind};
use crate::core::errors::DocqaError;

pub use ollama::OllamaProvider;
pub use openai::OpenAiCompatProvider;
pub use provider::LlmProvider;
pub use types::{ChatMessage, ChatRequest};

/// Build the provider selected by the configuration.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>, DocqaError> {
    let timeout = std::time::Duration::from_secs(config.request_timeout_secs);
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(DocqaError::provider)?;

    let provider: Arc<dyn LlmProvider> = match config.kind {
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(config.base_url.clone(), client)),
        ProviderKind::OpenaiCompat => Arc::new(OpenAiCompatProvider::new(
            config.base_url.clone(),
            config.api_key(),
            client,
        )),
    };

    Ok(provider)
}
