//! Embeddings from an OpenAI-compatible API.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{OutpostError, Result};
use crate::openai::{create_client, ClientOptions};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Inputs the embeddings endpoint accepts in one request. A snapshot is
/// embedded in a single request, never split.
const MAX_INPUTS_PER_REQUEST: usize = 2048;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder from configuration.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        let client = create_client(&ClientOptions {
            api_base: &settings.api_base,
            api_key_env: &settings.api_key_env,
            timeout: settings.timeout(),
        })?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            dimensions: settings.dimensions as usize,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings.into_iter().next().ok_or_else(|| {
            OutpostError::UpstreamUnavailable("Empty embedding response".to_string())
        })
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        if texts.len() > MAX_INPUTS_PER_REQUEST {
            return Err(OutpostError::Config(format!(
                "{} texts exceed the {} inputs one embedding request accepts",
                texts.len(),
                MAX_INPUTS_PER_REQUEST
            )));
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(texts.to_vec()))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| OutpostError::Config(format!("Failed to build embedding request: {}", e)))?;

        let response = self.client.embeddings().create(request).await.map_err(|e| {
            OutpostError::UpstreamUnavailable(format!("Embedding API error: {}", e))
        })?;

        if response.data.len() != texts.len() {
            return Err(OutpostError::UpstreamUnavailable(format!(
                "Embedding API returned {} vectors for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }

        // Sort by index to ensure correct order
        let mut embeddings: Vec<_> = response.data.into_iter().collect();
        embeddings.sort_by_key(|e| e.index);
        let all_embeddings: Vec<Vec<f32>> = embeddings.into_iter().map(|e| e.embedding).collect();

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serve an OpenAI-shaped `/embeddings` endpoint that counts requests.
    async fn spawn_embeddings_api() -> (String, Arc<AtomicUsize>) {
        async fn embeddings(
            State(requests): State<Arc<AtomicUsize>>,
            Json(body): Json<Value>,
        ) -> Json<Value> {
            requests.fetch_add(1, Ordering::SeqCst);
            let inputs = body["input"].as_array().map(Vec::len).unwrap_or(0);
            let data: Vec<Value> = (0..inputs)
                .map(|i| json!({ "object": "embedding", "index": i, "embedding": [i as f32, 1.0] }))
                .collect();
            Json(json!({
                "object": "list",
                "model": "text-embedding-3-small",
                "data": data,
                "usage": { "prompt_tokens": 0, "total_tokens": 0 }
            }))
        }

        let requests = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/embeddings", post(embeddings))
            .with_state(requests.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), requests)
    }

    fn embedder_for(api_base: String) -> OpenAIEmbedder {
        let settings = EmbeddingSettings {
            api_base,
            dimensions: 2,
            ..EmbeddingSettings::default()
        };
        OpenAIEmbedder::from_settings(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_large_batch_is_one_request() {
        let (api_base, requests) = spawn_embeddings_api().await;
        let embedder = embedder_for(api_base);

        let texts: Vec<String> = (0..151).map(|i| format!("Subway {} at Jalan {}", i, i)).collect();
        let vectors = embedder.embed_batch(&texts).await.unwrap();

        assert_eq!(vectors.len(), 151);
        assert_eq!(vectors[150], vec![150.0, 1.0]);
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected_without_request() {
        let (api_base, requests) = spawn_embeddings_api().await;
        let embedder = embedder_for(api_base);

        let texts = vec!["Subway".to_string(); MAX_INPUTS_PER_REQUEST + 1];
        let err = embedder.embed_batch(&texts).await.unwrap_err();

        assert!(matches!(err, OutpostError::Config(_)));
        assert_eq!(requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_embedder_from_settings() {
        let settings = EmbeddingSettings {
            model: "text-embedding-3-large".to_string(),
            dimensions: 1024,
            ..EmbeddingSettings::default()
        };
        let embedder = OpenAIEmbedder::from_settings(&settings).unwrap();
        assert_eq!(embedder.dimensions(), 1024);
        assert_eq!(embedder.model(), "text-embedding-3-large");
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let settings = EmbeddingSettings {
            api_base: "http://127.0.0.1:9".to_string(),
            ..EmbeddingSettings::default()
        };
        let embedder = OpenAIEmbedder::from_settings(&settings).unwrap();
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }
}
