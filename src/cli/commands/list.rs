//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::{OutletStore, SqliteOutletStore};
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let store = SqliteOutletStore::new(&settings.sqlite_path())?;

    match store.list_outlets().await {
        Ok(outlets) => {
            if outlets.is_empty() {
                Output::info("No outlets stored yet. Use 'outpost import <file.json>' to add some.");
            } else {
                Output::header(&format!("Outlets ({})", outlets.len()));
                println!();

                for outlet in &outlets {
                    Output::outlet(outlet);
                }

                let geocoded = outlets.iter().filter(|o| o.coordinates().is_some()).count();
                println!();
                Output::kv("Total outlets", &outlets.len().to_string());
                Output::kv("With coordinates", &geocoded.to_string());
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to list outlets: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
