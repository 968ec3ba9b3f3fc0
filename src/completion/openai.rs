//! Chat completions from an OpenAI-compatible API (Groq by default).

use super::Completer;
use crate::config::CompletionSettings;
use crate::error::{OutpostError, Result};
use crate::openai::{create_client, ClientOptions};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Completer backed by the chat completions endpoint.
pub struct OpenAICompleter {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAICompleter {
    /// Create a completer from configuration.
    pub fn from_settings(settings: &CompletionSettings) -> Result<Self> {
        let client = create_client(&ClientOptions {
            api_base: &settings.api_base,
            api_key_env: &settings.api_key_env,
            timeout: settings.timeout(),
        })?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Completer for OpenAICompleter {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Option<String>> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| OutpostError::Config(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_completion_tokens(max_tokens)
            .build()
            .map_err(|e| OutpostError::Config(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            OutpostError::UpstreamUnavailable(format!("Completion API error: {}", e))
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        debug!("Completion returned content: {}", content.is_some());
        Ok(content)
    }
}
