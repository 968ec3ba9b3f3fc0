//! Query resolution for Outpost.
//!
//! Coordinates a question from classification to answer: deterministic
//! resolvers first, generation only when no resolver can answer exactly.

use crate::answer::QueryAnswer;
use crate::completion::{Completer, OpenAICompleter};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{OutpostError, Result};
use crate::geo::{self, NearbyOutlet};
use crate::rag::RagEngine;
use crate::resolvers::{Resolution, ResolverChain};
use crate::store::{OutletStore, SqliteOutletStore};
use crate::vocabulary::LocationVocabulary;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The outlet query engine.
///
/// Collaborators are created once at construction and only read afterwards,
/// so one engine can serve any number of concurrent requests. Each request
/// fetches a fresh outlet snapshot and nothing survives between requests.
pub struct QueryEngine {
    store: Arc<dyn OutletStore>,
    resolvers: ResolverChain,
    rag: RagEngine,
    default_radius_km: f64,
}

impl QueryEngine {
    /// Create an engine backed by the configured SQLite store and hosted
    /// embedding and completion services.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let store = Arc::new(SqliteOutletStore::new(&settings.sqlite_path())?);
        let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);
        let completer = Arc::new(OpenAICompleter::from_settings(&settings.completion)?);

        Self::with_components(&settings, prompts, store, embedder, completer)
    }

    /// Create an engine with custom components.
    pub fn with_components(
        settings: &Settings,
        prompts: Prompts,
        store: Arc<dyn OutletStore>,
        embedder: Arc<dyn Embedder>,
        completer: Arc<dyn Completer>,
    ) -> Result<Self> {
        settings.validate()?;
        let query = &settings.query;
        let vocabulary = Arc::new(LocationVocabulary::from_settings(&settings.vocabulary));

        info!(
            "Query engine: {} fallback, {} location keywords",
            query.fallback,
            vocabulary.len()
        );

        let rag = RagEngine::new(embedder, completer, vocabulary.clone())
            .with_prompts(prompts)
            .with_strategy(query.fallback)
            .with_max_retrieved(query.max_retrieved)
            .with_max_tokens(settings.completion.max_tokens);

        Ok(Self {
            store,
            resolvers: ResolverChain::standard(vocabulary),
            rag,
            default_radius_km: query.default_radius_km,
        })
    }

    /// Radius used when a proximity query gives none.
    pub fn default_radius_km(&self) -> f64 {
        self.default_radius_km
    }

    /// Get a reference to the outlet store.
    pub fn store(&self) -> Arc<dyn OutletStore> {
        self.store.clone()
    }

    /// Answer a natural-language question about the outlets.
    ///
    /// Sentinel answers (see [`crate::answer`]) are returned as `Ok`; only bad
    /// input, store failures and collaborator failures are errors.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn resolve_query(&self, question: &str) -> Result<QueryAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(OutpostError::InvalidParameter(
                "question must not be empty".to_string(),
            ));
        }

        let outlets = self.store.list_outlets().await?;
        debug!("Snapshot has {} outlets", outlets.len());

        match self.resolvers.evaluate(question, &outlets) {
            Some((resolver, Resolution::Answered(answer))) => {
                info!("Answered by {} resolver", resolver);
                return Ok(answer);
            }
            Some((resolver, Resolution::Declined)) => {
                info!("{} resolver declined, falling back", resolver);
            }
            None => debug!("No resolver triggered"),
        }

        self.rag.answer(question, &outlets).await
    }

    /// Outlets within `radius_km` of a point, nearest first.
    ///
    /// `radius_km` defaults to the configured radius (5 km unless changed).
    #[instrument(skip(self))]
    pub async fn nearby_outlets(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> Result<Vec<NearbyOutlet>> {
        // Validate before touching the store.
        geo::validate_coordinates(latitude, longitude)?;

        let outlets = self.store.list_outlets().await?;
        let radius_km = radius_km.unwrap_or(self.default_radius_km);
        let nearby = geo::nearby(latitude, longitude, &outlets, Some(radius_km))?;

        debug!("{} of {} outlets within {} km", nearby.len(), outlets.len(), radius_km);
        Ok(nearby)
    }
}
