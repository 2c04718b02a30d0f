//! Configuration: built-in defaults, optional TOML file, env overrides.
//!
//! Precedence is defaults < config file < CLI flags. The only secret is
//! the provider API key, which is never written to the config file; it is
//! read from the environment variable named in `api_key_env`.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::DocqaError;

const CONFIG_PATH_ENV: &str = "DOCQA_CONFIG_PATH";
const DEFAULT_CONFIG_FILE: &str = "docqa.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Ollama's native API (`/api/chat`, `/api/embed`).
    Ollama,
    /// Any OpenAI-compatible server (LM Studio, remote keyed APIs).
    OpenaiCompat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    /// Model used for generation (answers, sections, questions).
    pub chat_model: String,
    /// Model used for embeddings.
    pub embedding_model: String,
    /// Name of the environment variable holding the API key, if any.
    pub api_key_env: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Ollama,
            base_url: "http://localhost:11434".to_string(),
            chat_model: "gemma3:4b".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            api_key_env: None,
            request_timeout_secs: 120,
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key from the environment, if one is configured.
    pub fn api_key(&self) -> Option<String> {
        let var = self.api_key_env.as_deref()?;
        match env::var(var) {
            Ok(value) if !value.trim().is_empty() => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, in characters. Must be < size.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of segments retrieved per question. A tunable, not a contract.
    pub top_k: usize,
    /// Maximum total context length in characters.
    pub max_context_length: usize,
    /// Whether to tag context entries with source citations.
    pub include_citations: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_context_length: 4000,
            include_citations: true,
        }
    }
}

/// Sampling knobs passed through to the chat model. Left unset, the
/// provider's own defaults apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicitly given path must exist; otherwise `DOCQA_CONFIG_PATH`
    /// and then `./docqa.toml` are consulted, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, DocqaError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(DocqaError::InvalidInput(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
            return Self::from_file(Path::new(&env_path));
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::from_file(default_path);
        }

        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self, DocqaError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| DocqaError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DocqaError> {
        if self.chunking.chunk_size == 0 {
            return Err(DocqaError::Config("chunk_size must be > 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(DocqaError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(DocqaError::Config("top_k must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.chunking.chunk_size, 500);
    }

    #[test]
    fn rejects_overlap_not_smaller_than_size() {
        let mut config = Config::default();
        config.chunking.chunk_size = 100;
        config.chunking.chunk_overlap = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_partial_toml_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[provider]\nchat_model = \"llama3\"\n\n[retrieval]\ntop_k = 20\n\n[generation]\ntemperature = 0.3\n"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.provider.chat_model, "llama3");
        assert_eq!(config.retrieval.top_k, 20);
        assert_eq!(config.generation.temperature, Some(0.3));
        // Untouched sections keep defaults
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert!(config.generation.max_tokens.is_none());
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/docqa.toml")));
        assert!(matches!(result, Err(DocqaError::InvalidInput(_))));
    }
}
