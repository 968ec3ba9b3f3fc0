//! SQLite-based outlet store implementation.

use super::{Outlet, OutletStore};
use crate::error::{OutpostError, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS outlets (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        address TEXT,
        operating_hours TEXT,
        waze_link TEXT,
        latitude REAL,
        longitude REAL
    );
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, name, address, operating_hours, waze_link, latitude, longitude FROM outlets";

const UPSERT: &str = r#"
    INSERT OR REPLACE INTO outlets
    (id, name, address, operating_hours, waze_link, latitude, longitude)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

/// SQLite-based outlet store.
pub struct SqliteOutletStore {
    conn: Mutex<Connection>,
}

impl SqliteOutletStore {
    /// Open (or create) the outlet database at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode so readers are not blocked by an import
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite outlet store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite outlet store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| OutpostError::Store(format!("Failed to acquire lock: {}", e)))
    }

    fn row_to_outlet(row: &Row<'_>) -> rusqlite::Result<Outlet> {
        Ok(Outlet {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            operating_hours: row.get(3)?,
            waze_link: row.get(4)?,
            latitude: row.get(5)?,
            longitude: row.get(6)?,
        })
    }
}

#[async_trait]
impl OutletStore for SqliteOutletStore {
    #[instrument(skip(self))]
    async fn list_outlets(&self) -> Result<Vec<Outlet>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], Self::row_to_outlet)?;

        let mut outlets = Vec::new();
        for row in rows {
            outlets.push(row?);
        }

        debug!("Loaded {} outlets", outlets.len());
        Ok(outlets)
    }

    #[instrument(skip(self))]
    async fn get_outlet(&self, id: i64) -> Result<Option<Outlet>> {
        let conn = self.lock()?;

        let outlet = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::row_to_outlet,
            )
            .optional()?;

        Ok(outlet)
    }

    #[instrument(skip(self, outlet), fields(id = outlet.id))]
    async fn upsert_outlet(&self, outlet: &Outlet) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            UPSERT,
            params![
                outlet.id,
                outlet.name,
                outlet.address,
                outlet.operating_hours,
                outlet.waze_link,
                outlet.latitude,
                outlet.longitude,
            ],
        )?;

        debug!("Upserted outlet {}", outlet.id);
        Ok(())
    }

    #[instrument(skip(self, outlets), fields(count = outlets.len()))]
    async fn upsert_batch(&self, outlets: &[Outlet]) -> Result<usize> {
        let conn = self.lock()?;

        let tx = conn.unchecked_transaction()?;

        for outlet in outlets {
            tx.execute(
                UPSERT,
                params![
                    outlet.id,
                    outlet.name,
                    outlet.address,
                    outlet.operating_hours,
                    outlet.waze_link,
                    outlet.latitude,
                    outlet.longitude,
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} outlets", outlets.len());
        Ok(outlets.len())
    }

    async fn outlet_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM outlets", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_outlet_store() {
        let store = SqliteOutletStore::in_memory().unwrap();

        let outlet = Outlet::new(2, "Subway Bangsar", "2 Jalan Bangsar")
            .with_hours("Mon-Sun: 8AM - 10PM")
            .with_coordinates(3.13, 101.67);
        store.upsert_outlet(&outlet).await.unwrap();

        let mut sparse = Outlet::new(1, "Subway Cheras", "");
        sparse.address = None;
        store.upsert_outlet(&sparse).await.unwrap();

        let outlets = store.list_outlets().await.unwrap();
        assert_eq!(outlets.len(), 2);
        assert_eq!(outlets[0], sparse);
        assert_eq!(outlets[1], outlet);

        assert_eq!(store.get_outlet(2).await.unwrap(), Some(outlet));
        assert_eq!(store.get_outlet(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_on_disk_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("outlets.db");

        {
            let store = SqliteOutletStore::new(&path).unwrap();
            let count = store
                .upsert_batch(&[
                    Outlet::new(1, "Subway KLCC", "3 KLCC Tower"),
                    Outlet::new(2, "Subway Bangsar", "1 Jalan Bangsar"),
                ])
                .await
                .unwrap();
            assert_eq!(count, 2);
        }

        let store = SqliteOutletStore::new(&path).unwrap();
        assert_eq!(store.outlet_count().await.unwrap(), 2);
    }
}
