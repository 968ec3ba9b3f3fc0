//! Location keywords shared by the counting resolver and the context compressor.
//!
//! Matching ignores case and whitespace, so "Bukit Bintang", "bukitbintang"
//! and "BUKIT  BINTANG" are the same keyword.

use crate::config::VocabularySettings;

/// A known location keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    name: String,
    key: String,
}

impl Location {
    fn new(name: &str) -> Option<Self> {
        let key = fold(name);
        if key.is_empty() {
            return None;
        }
        Some(Self {
            name: name.trim().to_string(),
            key,
        })
    }

    /// Display form, as configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `text` mentions this location.
    pub fn matches(&self, text: &str) -> bool {
        fold(text).contains(&self.key)
    }
}

/// Ordered table of location keywords.
#[derive(Debug, Clone, Default)]
pub struct LocationVocabulary {
    locations: Vec<Location>,
}

impl LocationVocabulary {
    /// Build a vocabulary; blank entries are ignored.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            locations: names
                .into_iter()
                .filter_map(|n| Location::new(n.as_ref()))
                .collect(),
        }
    }

    pub fn from_settings(settings: &VocabularySettings) -> Self {
        Self::new(&settings.locations)
    }

    /// First location, in vocabulary order, mentioned by `text`.
    pub fn find_in(&self, text: &str) -> Option<&Location> {
        let folded = fold(text);
        self.locations.iter().find(|l| folded.contains(&l.key))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Lowercase and drop all whitespace.
fn fold(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
