//! Coverage verification
//!
//! Checks a deployment set against the customer list. Every deployment is
//! resolved to its site coordinates and antenna spec before any customer is
//! checked; a deployment that references an unknown site or type means the
//! set did not come from these inputs and is reported as an inconsistency.

use crate::{
    AntennaCatalog, AntennaSpec, CandidateSite, Customer, DeploymentSet, GeoPoint, PlannerError,
    Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub covered: bool,
    /// First customer, in input order, that no deployment reaches
    pub first_uncovered: Option<String>,
}

impl VerificationResult {
    fn covered() -> Self {
        Self {
            covered: true,
            first_uncovered: None,
        }
    }

    fn uncovered(customer_id: &str) -> Self {
        Self {
            covered: false,
            first_uncovered: Some(customer_id.to_string()),
        }
    }
}

/// Confirm every customer is within range of at least one deployment
pub fn verify(
    customers: &[Customer],
    sites: &[CandidateSite],
    deployments: &DeploymentSet,
    catalog: &AntennaCatalog,
) -> Result<VerificationResult> {
    let site_index: HashMap<&str, &GeoPoint> = sites
        .iter()
        .map(|s| (s.id.as_str(), &s.location))
        .collect();

    let mut resolved: Vec<(&GeoPoint, &AntennaSpec)> = Vec::with_capacity(deployments.len());
    for d in deployments {
        let location = site_index.get(d.site_id.as_str()).copied().ok_or_else(|| {
            PlannerError::InconsistentState(format!(
                "deployment {} {} references unknown site",
                d.site_id, d.antenna
            ))
        })?;
        resolved.push((location, catalog.spec(d.antenna)?));
    }

    debug!(
        "Verifying {} customers against {} deployments",
        customers.len(),
        resolved.len()
    );

    let uncovered = customers.iter().find(|customer| {
        !resolved
            .iter()
            .any(|(location, spec)| spec.reaches(customer.location.distance_ft(location)))
    });

    match uncovered {
        Some(customer) => {
            warn!("Coverage check failed: customer {} is uncovered", customer.id);
            Ok(VerificationResult::uncovered(&customer.id))
        }
        None => {
            info!("Coverage check passed for all {} customers", customers.len());
            Ok(VerificationResult::covered())
        }
    }
}
