//! Generated answers for questions no resolver handles.

use super::context::{compressed_context, retrieval_context, PromptContext};
use super::index::FlatL2Index;
use crate::answer::{QueryAnswer, NO_ANSWER_GENERATED, NO_OUTLET_DATA};
use crate::completion::Completer;
use crate::config::{FallbackStrategy, Prompts};
use crate::embedding::Embedder;
use crate::error::Result;
use crate::store::Outlet;
use crate::vocabulary::LocationVocabulary;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Retrieval-augmented answer generation.
///
/// Holds only read-only collaborators and configuration; every call works
/// from the snapshot it is given and keeps nothing afterwards.
pub struct RagEngine {
    embedder: Arc<dyn Embedder>,
    completer: Arc<dyn Completer>,
    vocabulary: Arc<LocationVocabulary>,
    prompts: Prompts,
    strategy: FallbackStrategy,
    max_retrieved: usize,
    max_tokens: u32,
}

impl RagEngine {
    /// Create a RAG engine using retrieval, 20 documents and 256 tokens.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        completer: Arc<dyn Completer>,
        vocabulary: Arc<LocationVocabulary>,
    ) -> Self {
        Self {
            embedder,
            completer,
            vocabulary,
            prompts: Prompts::default(),
            strategy: FallbackStrategy::Retrieval,
            max_retrieved: 20,
            max_tokens: 256,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_strategy(mut self, strategy: FallbackStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the upper bound on retrieved documents. Zero is treated as one.
    pub fn with_max_retrieved(mut self, max_retrieved: usize) -> Self {
        self.max_retrieved = max_retrieved.max(1);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn strategy(&self) -> FallbackStrategy {
        self.strategy
    }

    /// Number of documents retrieved for a snapshot of `outlet_count` outlets.
    pub fn retrieval_k(&self, outlet_count: usize) -> usize {
        self.max_retrieved.min(outlet_count)
    }

    /// Answer `question` by generation over `outlets`.
    ///
    /// Makes at most one embedding batch call and exactly one completion call,
    /// and none at all when the snapshot has no named outlets.
    #[instrument(skip(self, outlets), fields(strategy = %self.strategy, outlets = outlets.len()))]
    pub async fn answer(&self, question: &str, outlets: &[Outlet]) -> Result<QueryAnswer> {
        let named = outlets.iter().filter(|o| o.has_name()).count();
        if named == 0 {
            info!("No named outlets in snapshot, nothing to generate from");
            return Ok(QueryAnswer::unavailable(NO_OUTLET_DATA));
        }

        let (template, context) = match self.strategy {
            FallbackStrategy::Retrieval => {
                let (index, query) =
                    FlatL2Index::build_with_query(self.embedder.as_ref(), outlets, question).await?;
                let k = self.retrieval_k(named);
                let hits = index.search(&query, k)?;
                (&self.prompts.qa.retrieval, retrieval_context(&hits, named))
            }
            FallbackStrategy::Compressed => (
                &self.prompts.qa.compressed,
                compressed_context(outlets, &self.vocabulary),
            ),
        };

        let prompt = self.render(template, question, &context);
        debug!(
            "Prompt has {} of {} outlets ({} chars)",
            context.included,
            context.outlet_count,
            prompt.len()
        );

        let content = self.completer.complete(&prompt, self.max_tokens).await?;

        Ok(match content.as_deref().map(str::trim) {
            Some(answer) if !answer.is_empty() => QueryAnswer::generated(answer),
            _ => QueryAnswer::unavailable(NO_ANSWER_GENERATED),
        })
    }

    fn render(&self, template: &str, question: &str, context: &PromptContext) -> String {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context.text.clone());
        vars.insert("outlet_count".to_string(), context.outlet_count.to_string());
        self.prompts.render_with_custom(template, &vars)
    }
}
