//! Prompt context for generated answers.

use super::compress::compress;
use super::index::SearchHit;
use crate::store::Outlet;
use crate::vocabulary::LocationVocabulary;

/// Outlet data placed into a generation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    /// One outlet per line.
    pub text: String,
    /// Named outlets in the snapshot, whether or not they made it into `text`.
    pub outlet_count: usize,
    /// Lines in `text`.
    pub included: usize,
}

/// Every named outlet as a compressed `name|location|closing` line.
pub fn compressed_context(outlets: &[Outlet], vocabulary: &LocationVocabulary) -> PromptContext {
    let lines: Vec<String> = outlets
        .iter()
        .filter(|o| o.has_name())
        .map(|o| compress(o, vocabulary).to_string())
        .collect();

    PromptContext {
        included: lines.len(),
        outlet_count: lines.len(),
        text: lines.join("\n"),
    }
}

/// Retrieved outlet descriptions, nearest first.
pub fn retrieval_context(hits: &[SearchHit<'_>], outlet_count: usize) -> PromptContext {
    PromptContext {
        text: hits
            .iter()
            .map(|h| h.document.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        outlet_count,
        included: hits.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::index::RetrievalDocument;

    #[test]
    fn test_compressed_context_skips_nameless_outlets() {
        let outlets = vec![
            Outlet::new(1, "Subway Telawi", "Jalan Telawi, Bangsar").with_hours("8AM - 10PM"),
            Outlet::new(2, "", "Jalan Ampang"),
            Outlet::new(3, "Subway Suria", "Suria KLCC").with_hours("10:00 - 22:00"),
        ];
        let vocabulary = LocationVocabulary::new(["Bangsar", "KLCC"]);

        let context = compressed_context(&outlets, &vocabulary);
        assert_eq!(context.outlet_count, 2);
        assert_eq!(context.included, 2);
        assert_eq!(
            context.text,
            "Subway Telawi|Bangsar|10PM\nSubway Suria|KLCC|22:00"
        );
    }

    #[test]
    fn test_retrieval_context_keeps_hit_order() {
        let docs = [
            RetrievalDocument {
                outlet_id: 1,
                text: "A at a. Hours: N/A".to_string(),
            },
            RetrievalDocument {
                outlet_id: 2,
                text: "B at b. Hours: N/A".to_string(),
            },
        ];
        let hits = vec![
            SearchHit {
                document: &docs[1],
                distance: 0.1,
            },
            SearchHit {
                document: &docs[0],
                distance: 0.4,
            },
        ];

        let context = retrieval_context(&hits, 5);
        assert_eq!(context.text, "B at b. Hours: N/A\nA at a. Hours: N/A");
        assert_eq!(context.included, 2);
        assert_eq!(context.outlet_count, 5);
    }
}
