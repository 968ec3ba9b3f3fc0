//! Import command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::{OutpostError, Result as OutpostResult};
use crate::store::{Outlet, OutletStore, SqliteOutletStore};
use anyhow::Result;
use std::path::Path;
use tracing::warn;

/// Run the import command.
pub async fn run_import(file: &str, settings: Settings) -> Result<()> {
    let path = Settings::expand_path(file);
    let outlets = read_outlets(&path)?;

    let valid: Vec<Outlet> = outlets
        .into_iter()
        .filter(|o| {
            if !o.has_name() {
                warn!("Skipping outlet {} without a name", o.id);
            }
            o.has_name()
        })
        .collect();

    let store = SqliteOutletStore::new(&settings.sqlite_path())?;
    let written = store.upsert_batch(&valid).await?;
    let total = store.outlet_count().await?;

    Output::success(&format!(
        "Imported {} outlets from {} ({} stored)",
        written,
        path.display(),
        total
    ));

    Ok(())
}

/// Parse a JSON array of outlet records.
fn read_outlets(path: &Path) -> OutpostResult<Vec<Outlet>> {
    let content = std::fs::read_to_string(path)?;
    let outlets: Vec<Outlet> = serde_json::from_str(&content)?;
    if outlets.is_empty() {
        return Err(OutpostError::InvalidParameter(format!(
            "{} contains no outlet records",
            path.display()
        )));
    }
    Ok(outlets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_outlets_accepts_partial_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "name": "Subway Telawi", "address": "Bangsar",
                  "operating_hours": "8AM - 10PM", "latitude": 3.13, "longitude": 101.67}},
                {{"id": 2, "name": "Subway Suria"}}
            ]"#
        )
        .unwrap();

        let outlets = read_outlets(file.path()).unwrap();
        assert_eq!(outlets.len(), 2);
        assert_eq!(outlets[0].coordinates(), Some((3.13, 101.67)));
        assert_eq!(outlets[1].address(), None);
    }

    #[test]
    fn test_read_outlets_rejects_empty_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(read_outlets(file.path()).unwrap_err().is_caller_error());
    }

    #[test]
    fn test_read_outlets_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"id\": 1}}").unwrap();
        assert!(matches!(
            read_outlets(file.path()),
            Err(OutpostError::Json(_))
        ));
    }
}
