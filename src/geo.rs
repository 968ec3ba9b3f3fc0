//! Proximity search over geocoded outlets.

use crate::error::{OutpostError, Result};
use crate::store::Outlet;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius used when a query does not give one.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// An outlet with its distance from a query origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyOutlet {
    #[serde(flatten)]
    pub outlet: Outlet,
    /// Great-circle distance in kilometres, rounded to metres.
    pub distance_km: f64,
}

/// Great-circle distance in kilometres between two points given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Reject latitudes outside [-90, 90] and longitudes outside [-180, 180].
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(OutpostError::InvalidParameter(format!(
            "latitude must be within [-90, 90], got {}",
            latitude
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(OutpostError::InvalidParameter(format!(
            "longitude must be within [-180, 180], got {}",
            longitude
        )));
    }
    Ok(())
}

/// Outlets within `radius_km` of the origin, nearest first.
///
/// Outlets without both coordinates are skipped. Equal distances keep the
/// order of `outlets`.
pub fn nearby(
    latitude: f64,
    longitude: f64,
    outlets: &[Outlet],
    radius_km: Option<f64>,
) -> Result<Vec<NearbyOutlet>> {
    validate_coordinates(latitude, longitude)?;

    let radius_km = radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(OutpostError::InvalidParameter(format!(
            "radius_km must be greater than 0, got {}",
            radius_km
        )));
    }

    let mut within: Vec<(&Outlet, f64)> = outlets
        .iter()
        .filter_map(|outlet| {
            let (lat, lon) = outlet.coordinates()?;
            let distance = haversine_km(latitude, longitude, lat, lon);
            (distance <= radius_km).then_some((outlet, distance))
        })
        .collect();

    // sort_by is stable
    within.sort_by(|a, b| a.1.total_cmp(&b.1));

    Ok(within
        .into_iter()
        .map(|(outlet, distance)| NearbyOutlet {
            outlet: outlet.clone(),
            distance_km: round_to_metres(distance),
        })
        .collect())
}

fn round_to_metres(km: f64) -> f64 {
    (km * 1000.0).round() / 1000.0
}
