use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::core::errors::DocqaError;

use super::provider::LlmProvider;
use super::types::ChatRequest;

#[derive(Clone)]
pub struct OllamaProvider {
    base_url: String,
    client: Client,
}

impl OllamaProvider {
    pub fn new(base_url: String, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn health_check(&self) -> Result<bool, DocqaError> {
        let url = format!("{}/api/tags", self.base_url);
        let res = self.client.get(&url).send().await;
        match res {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, DocqaError> {
        let url = format!("{}/api/chat", self.base_url);

        let mut options = serde_json::Map::new();
        if let Some(t) = request.temperature {
            options.insert("temperature".to_string(), json!(t));
        }
        if let Some(n) = request.max_tokens {
            options.insert("num_predict".to_string(), json!(n));
        }

        let mut body = json!({
            "model": model_id,
            "messages": request.messages,
            "stream": false,
        });
        if !options.is_empty() {
            if let Some(obj) = body.as_object_mut() {
                obj.insert("options".to_string(), Value::Object(options));
            }
        }

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(DocqaError::provider)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(DocqaError::Provider(format!("Ollama chat error: {}", text)));
        }

        let payload: Value = res.json().await.map_err(DocqaError::provider)?;

        let content = payload["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }

    async fn embed(
        &self,
        inputs: &[String],
        model_id: &str,
    ) -> Result<Vec<Vec<f32>>, DocqaError> {
        let url = format!("{}/api/embed", self.base_url);

        let body = json!({
            "model": model_id,
            "input": inputs,
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(DocqaError::provider)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(DocqaError::Provider(format!("Ollama embed error: {}", text)));
        }

        let payload: Value = res.json().await.map_err(DocqaError::provider)?;

        let mut embeddings = Vec::new();
        if let Some(data) = payload["embeddings"].as_array() {
            for item in data {
                if let Some(vals) = item.as_array() {
                    let vec: Vec<f32> = vals
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                    embeddings.push(vec);
                }
            }
        }

        Ok(embeddings)
    }
}
