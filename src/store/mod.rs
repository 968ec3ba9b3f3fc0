//! Outlet store abstraction for Outpost.
//!
//! Provides a trait-based interface over where outlet records live. The query
//! engine only ever reads a snapshot through [`OutletStore::list_outlets`].

mod memory;
mod sqlite;

pub use memory::MemoryOutletStore;
pub use sqlite::SqliteOutletStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single retail outlet record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    /// Externally assigned, stable identifier.
    pub id: i64,
    /// Outlet name.
    pub name: String,
    /// Free-text street address. Missing in malformed records.
    #[serde(default)]
    pub address: Option<String>,
    /// Free-text opening hours, possibly listing several ranges.
    #[serde(default)]
    pub operating_hours: Option<String>,
    /// External map link.
    #[serde(default)]
    pub waze_link: Option<String>,
    /// Latitude, present once the address has been geocoded.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude, present once the address has been geocoded.
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Outlet {
    /// Create an outlet with a name and address and no other details.
    pub fn new(id: i64, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: Some(address.into()),
            operating_hours: None,
            waze_link: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Set the opening hours text.
    pub fn with_hours(mut self, hours: impl Into<String>) -> Self {
        self.operating_hours = Some(hours.into());
        self
    }

    /// Set the geocoded position.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// The address, or `None` when missing or blank.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.trim().is_empty())
    }

    /// The opening hours, or `None` when missing or blank.
    pub fn hours(&self) -> Option<&str> {
        self.operating_hours.as_deref().filter(|h| !h.trim().is_empty())
    }

    /// Both coordinates, when present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// Whether the record carries a usable name.
    ///
    /// Records without one are malformed: counting, latest closing, retrieval
    /// and compression all skip them, and import rejects them.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Trait for outlet store implementations.
///
/// Snapshots are returned in ascending id order; that order is the
/// tie-breaking order everywhere downstream.
#[async_trait]
pub trait OutletStore: Send + Sync {
    /// Read every outlet.
    async fn list_outlets(&self) -> Result<Vec<Outlet>>;

    /// Read one outlet by id.
    async fn get_outlet(&self, id: i64) -> Result<Option<Outlet>>;

    /// Insert or replace an outlet by id.
    async fn upsert_outlet(&self, outlet: &Outlet) -> Result<()>;

    /// Insert or replace many outlets by id.
    async fn upsert_batch(&self, outlets: &[Outlet]) -> Result<usize>;

    /// Number of stored outlets.
    async fn outlet_count(&self) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_read_as_missing() {
        let mut outlet = Outlet::new(1, "Subway Bangsar", "  ").with_hours("");
        assert_eq!(outlet.address(), None);
        assert_eq!(outlet.hours(), None);

        outlet.address = None;
        assert_eq!(outlet.address(), None);
    }

    #[test]
    fn test_coordinates_require_both_values() {
        let mut outlet = Outlet::new(1, "Subway KLCC", "KLCC").with_coordinates(3.15, 101.71);
        assert_eq!(outlet.coordinates(), Some((3.15, 101.71)));

        outlet.longitude = None;
        assert_eq!(outlet.coordinates(), None);

        outlet.longitude = Some(f64::NAN);
        assert_eq!(outlet.coordinates(), None);
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let outlet: Outlet =
            serde_json::from_str(r#"{"id": 7, "name": "Subway Cheras", "latitude": 3.1}"#).unwrap();
        assert_eq!(outlet.id, 7);
        assert_eq!(outlet.address, None);
        assert_eq!(outlet.latitude, Some(3.1));
        assert_eq!(outlet.coordinates(), None);
    }
}
