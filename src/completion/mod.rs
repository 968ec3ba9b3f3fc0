//! Text generation for questions no resolver can answer.

mod openai;

pub use openai::OpenAICompleter;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text completion services.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Generate text for `prompt`.
    ///
    /// `Ok(None)` means the service answered without any content. Transport,
    /// quota and timeout failures are errors.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Option<String>>;
}
