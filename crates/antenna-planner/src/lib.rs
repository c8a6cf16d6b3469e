//! Antenna Deployment Planner
//!
//! Chooses one antenna type per candidate site so that every customer is
//! within range of at least one deployed antenna, favouring throughput per
//! customer and collapsing duplicate deployments.
//!
//! # Pipeline
//!
//! ```text
//! customers.csv ─┐
//!                ├─> assign ─> reduce ─> verify ─> solution.csv
//! sites.csv ─────┘     ▲                   ▲
//!                      └──── catalog ──────┘
//! ```
//!
//! | Stage    | Module                 | Output                          |
//! |----------|------------------------|---------------------------------|
//! | assign   | [`assigner`]           | best (site, type) per customer  |
//! | reduce   | [`reducer`]            | distinct deployments + metrics  |
//! | verify   | [`verifier`]           | covered / first uncovered       |
//! | export   | [`exporter`]           | `site_id,antenna_type` rows     |
//!
//! Distances are great-circle distances in feet on a spherical earth.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

pub mod assigner;
pub mod catalog;
pub mod exporter;
pub mod loader;
pub mod planner;
pub mod reducer;
pub mod report;
pub mod verifier;

pub use assigner::{assign, AssignedDeployment, Assignment};
pub use catalog::{AntennaCatalog, AntennaSpec, AntennaType};
pub use planner::{plan, PlanOutcome};
pub use reducer::{reduce, Deployment, DeploymentMetrics, DeploymentSet, Reduction};
pub use verifier::{verify, VerificationResult};

/// Mean earth radius in feet
pub const EARTH_RADIUS_FT: f64 = 20_925_524.9;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid input in {source_name} row {row}: {reason}")]
    InvalidInput {
        source_name: String,
        row: u64,
        reason: String,
    },
    #[error("Invalid antenna catalog: {0}")]
    InvalidCatalog(String),
    #[error("Inconsistent planner state: {0}")]
    InconsistentState(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse decimal-degree strings.
    ///
    /// The error carries only the reason; callers that know the source row
    /// wrap it via [`PlannerError::InvalidInput`].
    pub fn parse(latitude: &str, longitude: &str) -> std::result::Result<Self, String> {
        let lat = parse_degrees(latitude, "latitude")?;
        let lon = parse_degrees(longitude, "longitude")?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("latitude {} out of range [-90, 90]", lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("longitude {} out of range [-180, 180]", lon));
        }

        Ok(Self::new(lat, lon))
    }

    /// Great-circle distance to `other` in feet
    pub fn distance_ft(&self, other: &GeoPoint) -> f64 {
        haversine_ft(self, other)
    }
}

fn parse_degrees(raw: &str, field: &str) -> std::result::Result<f64, String> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| format!("{} {:?} is not a number", field, trimmed))?;
    if !value.is_finite() {
        return Err(format!("{} {:?} is not finite", field, trimmed));
    }
    Ok(value)
}

/// A customer location that must be covered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub location: GeoPoint,
}

impl Customer {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            location: GeoPoint::new(latitude, longitude),
        }
    }
}

/// A location where an antenna could be installed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSite {
    pub id: String,
    pub location: GeoPoint,
}

impl CandidateSite {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            location: GeoPoint::new(latitude, longitude),
        }
    }
}

/// Haversine distance between two points in feet
pub fn haversine_ft(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude * PI / 180.0;
    let lat2_rad = b.latitude * PI / 180.0;
    let dlat = (b.latitude - a.latitude) * PI / 180.0;
    let dlon = (b.longitude - a.longitude) * PI / 180.0;

    let h = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h marginally past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_FT * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let p = GeoPoint::new(40.7128, -74.0060);
        assert_eq!(haversine_ft(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // NYC to London: ~5,570 km = ~18.27M ft
        let nyc = GeoPoint::new(40.7128, -74.0060);
        let london = GeoPoint::new(51.5074, -0.1278);
        let dist = haversine_ft(&nyc, &london);
        let expected = 5_570.0 * 3_280.84;
        assert!((dist - expected).abs() < 50.0 * 3_280.84);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = GeoPoint::new(37.7749, -122.4194);
        let b = GeoPoint::new(37.7849, -122.4094);
        assert!((haversine_ft(&a, &b) - haversine_ft(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_antipodal_is_half_circumference() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let dist = haversine_ft(&a, &b);
        assert!((dist - PI * EARTH_RADIUS_FT).abs() < 1.0);
    }

    #[test]
    fn test_one_thousandth_degree_latitude() {
        // 0.001 deg of arc ~ 365 ft
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.001, 0.0);
        let dist = a.distance_ft(&b);
        assert!((dist - 365.22).abs() < 0.5, "got {}", dist);
    }

    #[test]
    fn test_parse_valid() {
        let p = GeoPoint::parse(" 37.5 ", "-122.25").unwrap();
        assert_eq!(p, GeoPoint::new(37.5, -122.25));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(GeoPoint::parse("north", "0").is_err());
        assert!(GeoPoint::parse("0", "").is_err());
        assert!(GeoPoint::parse("NaN", "0").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(GeoPoint::parse("91", "0").is_err());
        assert!(GeoPoint::parse("0", "-180.5").is_err());
    }
}
