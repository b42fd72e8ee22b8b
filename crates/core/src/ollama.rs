use crate::error::{ConfigurationError, EmbeddingServiceError, GenerationServiceError};
use crate::traits::{TextEmbedder, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

/// Client for an Ollama-compatible model service. One model name serves both
/// contracts: `/api/embeddings` for vectors and `/api/generate` for text.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: impl Into<String>) -> Result<Self, ConfigurationError> {
        Url::parse(base_url)?;
        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextEmbedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingServiceError> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&json!({
                "model": self.model,
                "prompt": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmbeddingServiceError::BackendResponse {
                backend: "ollama".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        let embedding = parsed
            .pointer("/embedding")
            .and_then(Value::as_array)
            .ok_or_else(|| EmbeddingServiceError::BackendResponse {
                backend: "ollama".to_string(),
                details: "response has no embedding array".to_string(),
            })?;

        embedding
            .iter()
            .map(|value| {
                value
                    .as_f64()
                    .map(|number| number as f32)
                    .ok_or_else(|| EmbeddingServiceError::BackendResponse {
                        backend: "ollama".to_string(),
                        details: "embedding contains a non-numeric value".to_string(),
                    })
            })
            .collect()
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationServiceError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationServiceError::BackendResponse {
                backend: "ollama".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        parsed
            .pointer("/response")
            .and_then(Value::as_str)
            .map(|text| text.to_string())
            .ok_or_else(|| GenerationServiceError::BackendResponse {
                backend: "ollama".to_string(),
                details: "response has no text field".to_string(),
            })
    }
}
