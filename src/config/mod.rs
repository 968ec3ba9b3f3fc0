//! Configuration module for Outpost.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts};
pub use settings::{
    CompletionSettings, EmbeddingSettings, FallbackStrategy, GeneralSettings, PromptSettings,
    QuerySettings, Settings, StoreSettings, VocabularySettings,
};
