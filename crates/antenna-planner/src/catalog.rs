//! Antenna type catalog
//!
//! Tiers trade throughput for reach: each step up the tier list covers a
//! larger radius at lower throughput and higher cost.

use crate::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Antenna type identifiers in tier order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AntennaType {
    #[serde(rename = "T-1")]
    T1,
    #[serde(rename = "T-2")]
    T2,
    #[serde(rename = "T-3")]
    T3,
    #[serde(rename = "T-4")]
    T4,
    #[serde(rename = "T-5")]
    T5,
}

impl AntennaType {
    pub const ALL: [AntennaType; 5] = [
        AntennaType::T1,
        AntennaType::T2,
        AntennaType::T3,
        AntennaType::T4,
        AntennaType::T5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::T1 => "T-1",
            Self::T2 => "T-2",
            Self::T3 => "T-3",
            Self::T4 => "T-4",
            Self::T5 => "T-5",
        }
    }
}

impl fmt::Display for AntennaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AntennaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == trimmed)
            .ok_or_else(|| format!("unknown antenna type {:?}", trimmed))
    }
}

/// Deployable characteristics of one antenna type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AntennaSpec {
    pub antenna: AntennaType,
    /// Coverage radius in feet
    pub range_ft: f64,
    pub throughput: f64,
    pub cost: f64,
}

impl AntennaSpec {
    pub fn new(antenna: AntennaType, range_ft: f64, throughput: f64, cost: f64) -> Self {
        Self {
            antenna,
            range_ft,
            throughput,
            cost,
        }
    }

    /// Whether a point `distance_ft` away is within this antenna's radius
    pub fn reaches(&self, distance_ft: f64) -> bool {
        distance_ft <= self.range_ft
    }
}

/// Read-only table of antenna specs, one per type, in tier order.
///
/// Built once at startup and passed by reference to the assigner, reducer
/// and verifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AntennaCatalog {
    specs: Vec<AntennaSpec>,
}

impl AntennaCatalog {
    /// Validate and build a catalog from arbitrary specs
    pub fn new(mut specs: Vec<AntennaSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(PlannerError::InvalidCatalog(
                "catalog has no antenna types".to_string(),
            ));
        }

        specs.sort_by_key(|s| s.antenna);
        for pair in specs.windows(2) {
            if pair[0].antenna == pair[1].antenna {
                return Err(PlannerError::InvalidCatalog(format!(
                    "duplicate spec for {}",
                    pair[0].antenna
                )));
            }
        }

        for spec in &specs {
            let fields = [
                ("range_ft", spec.range_ft),
                ("throughput", spec.throughput),
                ("cost", spec.cost),
            ];
            for (name, value) in fields {
                if !(value.is_finite() && value > 0.0) {
                    return Err(PlannerError::InvalidCatalog(format!(
                        "{} of {} must be positive, got {}",
                        name, spec.antenna, value
                    )));
                }
            }
        }

        let catalog = Self { specs };
        if !catalog.is_tier_ordered() {
            warn!(
                "Antenna tiers out of order: expected range and cost to rise \
                 and throughput to fall with each tier"
            );
        }

        Ok(catalog)
    }

    /// Whether each higher tier reaches at least as far, costs at least as
    /// much and delivers no more throughput than the one below it
    pub fn is_tier_ordered(&self) -> bool {
        self.specs.windows(2).all(|pair| {
            let (lower, higher) = (&pair[0], &pair[1]);
            higher.range_ft >= lower.range_ft
                && higher.throughput <= lower.throughput
                && higher.cost >= lower.cost
        })
    }

    /// The five-tier deployment table
    pub fn standard() -> Self {
        Self {
            specs: vec![
                AntennaSpec::new(AntennaType::T1, 100.0, 500.0, 1000.0),
                AntennaSpec::new(AntennaType::T2, 200.0, 400.0, 2000.0),
                AntennaSpec::new(AntennaType::T3, 300.0, 300.0, 3000.0),
                AntennaSpec::new(AntennaType::T4, 400.0, 200.0, 4000.0),
                AntennaSpec::new(AntennaType::T5, 500.0, 100.0, 5000.0),
            ],
        }
    }

    /// Load a catalog from a JSON array of specs
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading antenna catalog from {:?}", path);

        let file = File::open(path)?;
        let specs: Vec<AntennaSpec> = serde_json::from_reader(BufReader::new(file))?;
        let catalog = Self::new(specs)?;

        info!("Loaded {} antenna types", catalog.len());
        Ok(catalog)
    }

    pub fn get(&self, antenna: AntennaType) -> Option<&AntennaSpec> {
        self.specs.iter().find(|s| s.antenna == antenna)
    }

    /// Lookup that treats a missing type as an internal inconsistency
    pub fn spec(&self, antenna: AntennaType) -> Result<&AntennaSpec> {
        self.get(antenna).ok_or_else(|| {
            PlannerError::InconsistentState(format!("antenna type {} not in catalog", antenna))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &AntennaSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Largest coverage radius of any type
    pub fn max_range_ft(&self) -> f64 {
        self.specs.iter().map(|s| s.range_ft).fold(0.0, f64::max)
    }
}

impl Default for AntennaCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
