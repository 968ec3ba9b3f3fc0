//! Configuration settings for Outpost.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub store: StoreSettings,
    pub embedding: EmbeddingSettings,
    pub completion: CompletionSettings,
    pub query: QuerySettings,
    pub vocabulary: VocabularySettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.outpost".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Outlet store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path to the SQLite database holding outlet records.
    pub sqlite_path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            sqlite_path: "~/.outpost/outlets.db".to_string(),
        }
    }
}

/// Embedding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Base URL of an OpenAI-compatible embeddings API.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 384,
            timeout_secs: 30,
        }
    }
}

impl EmbeddingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Completion service settings.
///
/// These are fixed per process; nothing about a request changes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Base URL of an OpenAI-compatible chat completions API.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Model used for answer generation.
    pub model: String,
    /// Maximum tokens in a generated answer.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            max_tokens: 256,
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

impl CompletionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How a question is answered when no deterministic resolver can.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    /// Embed every outlet, retrieve the nearest to the question, and prompt
    /// with those descriptions.
    #[default]
    Retrieval,
    /// Prompt with a compressed line for every outlet plus the total count.
    Compressed,
}

impl std::str::FromStr for FallbackStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "retrieval" | "rag" => Ok(FallbackStrategy::Retrieval),
            "compressed" | "compression" => Ok(FallbackStrategy::Compressed),
            _ => Err(format!("Unknown fallback strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackStrategy::Retrieval => write!(f, "retrieval"),
            FallbackStrategy::Compressed => write!(f, "compressed"),
        }
    }
}

/// Query engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Fallback used when no resolver answers.
    pub fallback: FallbackStrategy,
    /// Upper bound on retrieved outlet descriptions per question.
    pub max_retrieved: usize,
    /// Search radius used when a nearby query omits one.
    pub default_radius_km: f64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            fallback: FallbackStrategy::Retrieval,
            max_retrieved: 20,
            default_radius_km: 5.0,
        }
    }
}

/// Location keywords recognised in questions and addresses.
///
/// Order matters: the first keyword found wins, so more specific names must
/// come before names they contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularySettings {
    pub locations: Vec<String>,
}

impl Default for VocabularySettings {
    fn default() -> Self {
        let locations = [
            "Bangsar South",
            "Bangsar",
            "KLCC",
            "Bukit Bintang",
            "Mont Kiara",
            "Sri Hartamas",
            "Petaling Jaya",
            "Subang Jaya",
            "Shah Alam",
            "Puchong",
            "Cheras",
            "Ampang",
            "Damansara",
            "Setapak",
            "Kepong",
            "Wangsa Maju",
            "Cyberjaya",
            "Putrajaya",
            "Klang",
            "Kuala Lumpur",
        ];
        Self {
            locations: locations.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Reject values the query engine cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |msg: &str| Err(crate::error::OutpostError::Config(msg.to_string()));

        if self.query.max_retrieved == 0 {
            return invalid("query.max_retrieved must be at least 1");
        }
        if !self.query.default_radius_km.is_finite() || self.query.default_radius_km <= 0.0 {
            return invalid("query.default_radius_km must be greater than 0");
        }
        if self.vocabulary.locations.iter().all(|l| l.trim().is_empty()) {
            return invalid("vocabulary.locations must name at least one location");
        }
        if self.completion.max_tokens == 0 {
            return invalid("completion.max_tokens must be at least 1");
        }
        Ok(())
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::OutpostError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("outpost")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.store.sqlite_path)
    }
}
