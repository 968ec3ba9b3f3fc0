//! Exact nearest-neighbour index over outlet descriptions.
//!
//! Brute-force L2 search over a flat vector list. Outlet sets are small, so
//! the index is rebuilt from the current snapshot for every question.

use crate::embedding::Embedder;
use crate::error::{OutpostError, Result};
use crate::store::Outlet;
use tracing::{debug, instrument};

/// One outlet's searchable description.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalDocument {
    pub outlet_id: i64,
    /// `"{name} at {address}. Hours: {hours}"`
    pub text: String,
}

impl RetrievalDocument {
    pub fn from_outlet(outlet: &Outlet) -> Self {
        Self {
            outlet_id: outlet.id,
            text: format!(
                "{} at {}. Hours: {}",
                outlet.name.trim(),
                outlet.address().unwrap_or("N/A"),
                outlet.hours().unwrap_or("N/A")
            ),
        }
    }
}

/// A document and its distance from the query.
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub document: &'a RetrievalDocument,
    /// Squared L2 distance; smaller is closer.
    pub distance: f32,
}

/// Flat index with exact L2 search.
#[derive(Debug, Clone, Default)]
pub struct FlatL2Index {
    dimension: usize,
    documents: Vec<RetrievalDocument>,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    /// Embed every outlet and `question` in a single batch.
    ///
    /// Returns the index and the question's embedding. Nameless outlets are
    /// not indexed; a snapshot without named outlets makes no embedding call
    /// and yields an empty index.
    #[instrument(skip_all, fields(outlets = outlets.len()))]
    pub async fn build_with_query(
        embedder: &dyn Embedder,
        outlets: &[Outlet],
        question: &str,
    ) -> Result<(Self, Vec<f32>)> {
        let documents: Vec<RetrievalDocument> = outlets
            .iter()
            .filter(|o| o.has_name())
            .map(RetrievalDocument::from_outlet)
            .collect();
        if documents.is_empty() {
            return Ok((Self::default(), Vec::new()));
        }

        let mut texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        texts.push(question.to_string());
        let mut vectors = embedder.embed_batch(&texts).await?;

        // The question goes last; a short response is caught by from_embeddings
        let query = if vectors.len() == texts.len() {
            vectors.pop().unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok((Self::from_embeddings(documents, vectors)?, query))
    }

    /// Index precomputed embeddings, one per document.
    ///
    /// Fails with [`OutpostError::UpstreamUnavailable`] when the vectors do not
    /// line up with the documents, since they come from the embedding service.
    pub fn from_embeddings(documents: Vec<RetrievalDocument>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if documents.len() != vectors.len() {
            return Err(OutpostError::UpstreamUnavailable(format!(
                "Got {} embeddings for {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if vectors.iter().any(|v| v.len() != dimension || v.is_empty()) {
            return Err(OutpostError::UpstreamUnavailable(
                "Embeddings have inconsistent dimensions".to_string(),
            ));
        }

        debug!("Indexed {} documents ({} dimensions)", documents.len(), dimension);
        Ok(Self {
            dimension,
            documents,
            vectors,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The `k` documents nearest to `query`, closest first.
    ///
    /// Returns `min(k, len)` hits; equal distances keep index order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit<'_>>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(OutpostError::UpstreamUnavailable(format!(
                "Query embedding has {} dimensions, index has {}",
                query.len(),
                self.dimension
            )));
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .documents
            .iter()
            .zip(&self.vectors)
            .map(|(document, vector)| SearchHit {
                document,
                distance: squared_l2(query, vector),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }
}

/// Squared Euclidean distance.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn documents(n: usize) -> Vec<RetrievalDocument> {
        (0..n)
            .map(|i| RetrievalDocument {
                outlet_id: i as i64,
                text: format!("doc {}", i),
            })
            .collect()
    }

    /// Embeds a text as [len, count of 'a'].
    #[derive(Default)]
    struct CountingEmbedder {
        batch_calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, text.matches('a').count() as f32])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            let mut out = Vec::new();
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[test]
    fn test_document_text() {
        let outlet = Outlet::new(4, "Subway KLCC", "Suria KLCC").with_hours("8AM - 10PM");
        assert_eq!(
            RetrievalDocument::from_outlet(&outlet).text,
            "Subway KLCC at Suria KLCC. Hours: 8AM - 10PM"
        );

        let bare = Outlet::new(5, "Subway Ampang", "Ampang Point");
        assert_eq!(
            RetrievalDocument::from_outlet(&bare).text,
            "Subway Ampang at Ampang Point. Hours: N/A"
        );
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = FlatL2Index::from_embeddings(
            documents(3),
            vec![vec![5.0, 5.0], vec![0.0, 1.0], vec![1.0, 1.0]],
        )
        .unwrap();

        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        let ids: Vec<i64> = hits.iter().map(|h| h.document.outlet_id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert_eq!(hits[0].distance, 1.0);
        assert_eq!(hits[1].distance, 2.0);
    }

    #[test]
    fn test_search_returns_min_of_k_and_len() {
        let index = FlatL2Index::from_embeddings(
            documents(2),
            vec![vec![1.0], vec![2.0]],
        )
        .unwrap();
        assert_eq!(index.search(&[0.0], 20).unwrap().len(), 2);
        assert_eq!(index.search(&[0.0], 1).unwrap().len(), 1);
        assert!(index.search(&[0.0], 0).unwrap().is_empty());

        let empty = FlatL2Index::default();
        assert!(empty.search(&[0.0], 20).unwrap().is_empty());
    }

    #[test]
    fn test_ties_keep_index_order() {
        let index = FlatL2Index::from_embeddings(
            documents(3),
            vec![vec![1.0], vec![-1.0], vec![1.0]],
        )
        .unwrap();
        let ids: Vec<i64> = index
            .search(&[0.0], 3)
            .unwrap()
            .iter()
            .map(|h| h.document.outlet_id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_malformed_embeddings_are_upstream_errors() {
        let err = FlatL2Index::from_embeddings(documents(2), vec![vec![1.0]]).unwrap_err();
        assert!(err.is_upstream());

        let err =
            FlatL2Index::from_embeddings(documents(2), vec![vec![1.0], vec![1.0, 2.0]]).unwrap_err();
        assert!(err.is_upstream());

        let index = FlatL2Index::from_embeddings(documents(1), vec![vec![1.0, 2.0]]).unwrap();
        assert!(index.search(&[1.0], 1).unwrap_err().is_upstream());
    }

    #[tokio::test]
    async fn test_build_embeds_documents_and_question_in_one_batch() {
        let embedder = CountingEmbedder::default();
        let outlets = vec![
            Outlet::new(1, "Subway Bangsar", "Bangsar"),
            Outlet::new(2, "Subway KL", "KL"),
        ];

        let question = RetrievalDocument::from_outlet(&outlets[1]).text;
        let (index, query) = FlatL2Index::build_with_query(&embedder, &outlets, &question)
            .await
            .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.dimension(), 2);
        assert_eq!(embedder.batch_calls.load(Ordering::SeqCst), 1);

        let hits = index.search(&query, 1).unwrap();
        assert_eq!(hits[0].document.outlet_id, 2);
        assert_eq!(hits[0].distance, 0.0);
    }

    #[tokio::test]
    async fn test_build_skips_nameless_outlets() {
        let embedder = CountingEmbedder::default();
        let outlets = vec![
            Outlet::new(1, "", "Bangsar"),
            Outlet::new(2, "Subway KL", "KL"),
        ];

        let (index, _) = FlatL2Index::build_with_query(&embedder, &outlets, "KL")
            .await
            .unwrap();
        assert_eq!(index.len(), 1);

        let (index, query) = FlatL2Index::build_with_query(&embedder, &outlets[..1], "KL")
            .await
            .unwrap();
        assert!(index.is_empty());
        assert!(query.is_empty());
        assert_eq!(embedder.batch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_build_empty_snapshot_skips_embedding() {
        let embedder = CountingEmbedder::default();
        let (index, query) = FlatL2Index::build_with_query(&embedder, &[], "anything")
            .await
            .unwrap();
        assert!(index.is_empty());
        assert!(query.is_empty());
        assert_eq!(embedder.batch_calls.load(Ordering::SeqCst), 0);
    }
}
