//! Nearby command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::QueryEngine;
use anyhow::Result;

/// Run the nearby command.
pub async fn run_nearby(
    latitude: f64,
    longitude: f64,
    distance_km: Option<f64>,
    settings: Settings,
) -> Result<()> {
    let engine = QueryEngine::new(settings)?;
    let radius_km = distance_km.unwrap_or(engine.default_radius_km());

    let results = match engine.nearby_outlets(latitude, longitude, Some(radius_km)).await {
        Ok(results) => results,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    if results.is_empty() {
        Output::info(&format!(
            "No outlets within {} km of ({}, {}).",
            radius_km, latitude, longitude
        ));
        return Ok(());
    }

    Output::header(&format!("Outlets within {} km ({})", radius_km, results.len()));
    println!();
    for result in &results {
        Output::nearby(result);
    }

    Ok(())
}
