//! In-memory outlet store implementation.
//!
//! Useful for testing and small datasets.

use super::{Outlet, OutletStore};
use crate::error::{OutpostError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory outlet store.
pub struct MemoryOutletStore {
    outlets: RwLock<BTreeMap<i64, Outlet>>,
}

impl MemoryOutletStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            outlets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a store holding the given outlets.
    pub fn with_outlets(outlets: Vec<Outlet>) -> Self {
        Self {
            outlets: RwLock::new(outlets.into_iter().map(|o| (o.id, o)).collect()),
        }
    }
}

impl Default for MemoryOutletStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> OutpostError {
    OutpostError::Store(format!("Failed to acquire lock: {}", e))
}

#[async_trait]
impl OutletStore for MemoryOutletStore {
    async fn list_outlets(&self) -> Result<Vec<Outlet>> {
        let outlets = self.outlets.read().map_err(poisoned)?;
        Ok(outlets.values().cloned().collect())
    }

    async fn get_outlet(&self, id: i64) -> Result<Option<Outlet>> {
        let outlets = self.outlets.read().map_err(poisoned)?;
        Ok(outlets.get(&id).cloned())
    }

    async fn upsert_outlet(&self, outlet: &Outlet) -> Result<()> {
        let mut outlets = self.outlets.write().map_err(poisoned)?;
        outlets.insert(outlet.id, outlet.clone());
        Ok(())
    }

    async fn upsert_batch(&self, batch: &[Outlet]) -> Result<usize> {
        let mut outlets = self.outlets.write().map_err(poisoned)?;
        for outlet in batch {
            outlets.insert(outlet.id, outlet.clone());
        }
        Ok(batch.len())
    }

    async fn outlet_count(&self) -> Result<usize> {
        let outlets = self.outlets.read().map_err(poisoned)?;
        Ok(outlets.len())
    }
}
