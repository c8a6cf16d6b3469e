//! Data loading from delimited files
//!
//! Both input files share one layout: a header row, the identifier in
//! column 0 and decimal-degree latitude/longitude in columns 2 and 3.
//! Any malformed row aborts the load.

use crate::{CandidateSite, Customer, GeoPoint, PlannerError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

const ID_COLUMN: usize = 0;
const LAT_COLUMN: usize = 2;
const LON_COLUMN: usize = 3;

/// One identified location read from an input file
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub id: String,
    pub location: GeoPoint,
}

/// Read identified points from any CSV source.
///
/// `source_name` labels errors, usually the file path.
pub fn read_points<R: Read>(reader: R, source_name: &str) -> Result<Vec<PointRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // Header occupies line 1
        let row = record
            .position()
            .map(|p| p.line())
            .unwrap_or(i as u64 + 2);
        let invalid = |reason: String| PlannerError::InvalidInput {
            source_name: source_name.to_string(),
            row,
            reason,
        };

        let id = field(&record, ID_COLUMN, "identifier").map_err(&invalid)?;
        if id.is_empty() {
            return Err(invalid("empty identifier".to_string()));
        }
        let lat = field(&record, LAT_COLUMN, "latitude").map_err(&invalid)?;
        let lon = field(&record, LON_COLUMN, "longitude").map_err(&invalid)?;
        let location = GeoPoint::parse(lat, lon).map_err(&invalid)?;

        if !seen.insert(id.to_string()) {
            return Err(invalid(format!("duplicate identifier {:?}", id)));
        }

        points.push(PointRecord {
            id: id.to_string(),
            location,
        });
    }

    Ok(points)
}

fn field<'r>(
    record: &'r StringRecord,
    column: usize,
    name: &str,
) -> std::result::Result<&'r str, String> {
    record
        .get(column)
        .ok_or_else(|| format!("missing {} column {}", name, column))
}

fn read_points_from_path(path: &Path) -> Result<Vec<PointRecord>> {
    let file = File::open(path)?;
    read_points(file, &path.display().to_string())
}

/// Load customer locations from a CSV file
pub fn load_customers(path: impl AsRef<Path>) -> Result<Vec<Customer>> {
    let path = path.as_ref();
    info!("Loading customers from {:?}", path);

    let customers: Vec<Customer> = read_points_from_path(path)?
        .into_iter()
        .map(|p| Customer {
            id: p.id,
            location: p.location,
        })
        .collect();

    info!("Loaded {} customers", customers.len());
    Ok(customers)
}

/// Load candidate antenna sites from a CSV file
pub fn load_sites(path: impl AsRef<Path>) -> Result<Vec<CandidateSite>> {
    let path = path.as_ref();
    info!("Loading candidate sites from {:?}", path);

    let sites: Vec<CandidateSite> = read_points_from_path(path)?
        .into_iter()
        .map(|p| CandidateSite {
            id: p.id,
            location: p.location,
        })
        .collect();

    info!("Loaded {} candidate sites", sites.len());
    Ok(sites)
}
