//! RAG (Retrieval-Augmented Generation) fallback for outlet questions.
//!
//! Used when no deterministic resolver can answer. One of two contexts feeds
//! the completion service, chosen per engine by [`FallbackStrategy`]:
//! the nearest outlet descriptions from a per-request [`FlatL2Index`], or a
//! compressed line for every outlet.
//!
//! [`FallbackStrategy`]: crate::config::FallbackStrategy

pub mod compress;
pub mod context;
pub mod index;
mod response;

pub use compress::{compress, CompressedOutlet};
pub use context::PromptContext;
pub use index::{FlatL2Index, RetrievalDocument, SearchHit};
pub use response::RagEngine;
