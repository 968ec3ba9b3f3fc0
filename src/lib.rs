//! Outpost - Outlet Query Resolution
//!
//! Answers natural-language questions about a chain's retail outlets and
//! finds outlets near a point.
//!
//! # Overview
//!
//! Outpost allows you to:
//! - Count outlets in a known location and find the latest-closing outlet exactly
//! - Fall back to a hosted language model for everything else
//! - Rank outlets by great-circle distance from a coordinate
//! - Serve all of the above over a small HTTP API
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `store` - Outlet persistence (SQLite, in-memory)
//! - `geo` - Proximity search
//! - `hours` - Time extraction from operating-hours text
//! - `vocabulary` - Known location keywords
//! - `resolvers` - Deterministic answers
//! - `embedding` / `completion` - Hosted model clients
//! - `rag` - Generation fallback (retrieval or compressed context)
//! - `orchestrator` - Query resolution
//!
//! # Example
//!
//! ```rust,no_run
//! use outpost::config::Settings;
//! use outpost::orchestrator::QueryEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let engine = QueryEngine::new(settings)?;
//!
//!     let answer = engine.resolve_query("How many outlets in Bangsar?").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod answer;
pub mod cli;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod geo;
pub mod hours;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod resolvers;
pub mod store;
pub mod vocabulary;

pub use answer::{AnswerKind, QueryAnswer};
pub use error::{OutpostError, Result};
