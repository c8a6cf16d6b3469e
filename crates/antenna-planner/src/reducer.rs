//! Deployment reduction
//!
//! Collapses the per-customer assignment into the distinct (site, type)
//! deployments that actually have to be built. Customers that were assigned
//! the same pair share one physical antenna, so its cost is paid once.
//!
//! This removes incidental duplicates only. It does not replace several
//! small-radius deployments with one larger antenna that would cover the
//! same customers for less, so the result is not a minimum set cover.

use crate::{AntennaCatalog, AntennaType, Assignment, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// One concrete antenna installation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Deployment {
    pub site_id: String,
    pub antenna: AntennaType,
}

impl Deployment {
    pub fn new(site_id: impl Into<String>, antenna: AntennaType) -> Self {
        Self {
            site_id: site_id.into(),
            antenna,
        }
    }
}

/// Distinct deployments, ordered by site id then tier
pub type DeploymentSet = BTreeSet<Deployment>;

/// Aggregate figures for a reduced deployment set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentMetrics {
    pub deployment_count: usize,
    /// Sum of catalog cost over distinct deployments
    pub total_cost: f64,
    pub customers_served: usize,
    pub coverage_gaps: usize,
    /// Sum of the throughput delivered to each served customer
    pub total_throughput: f64,
    pub customers_per_deployment: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub deployments: DeploymentSet,
    pub metrics: DeploymentMetrics,
}

/// Reduce an assignment to its distinct deployments and their metrics
pub fn reduce(assignment: &Assignment, catalog: &AntennaCatalog) -> Result<Reduction> {
    let deployments: DeploymentSet = assignment
        .iter()
        .map(|(_, assigned)| assigned.deployment.clone())
        .collect();

    let total_cost = deployments
        .iter()
        .map(|d| catalog.spec(d.antenna).map(|spec| spec.cost))
        .sum::<Result<f64>>()?;

    let total_throughput = assignment.iter().map(|(_, a)| a.throughput).sum::<f64>();

    let customers_per_deployment = assignment.iter().fold(
        BTreeMap::<String, usize>::new(),
        |mut counts, (_, assigned)| {
            *counts.entry(deployment_key(&assigned.deployment)).or_insert(0) += 1;
            counts
        },
    );

    let metrics = DeploymentMetrics {
        deployment_count: deployments.len(),
        total_cost,
        customers_served: assignment.len(),
        coverage_gaps: assignment.gaps().len(),
        total_throughput,
        customers_per_deployment,
    };

    info!(
        "Reduced {} assignments to {} deployments (total cost {})",
        assignment.len(),
        metrics.deployment_count,
        metrics.total_cost
    );

    Ok(Reduction {
        deployments,
        metrics,
    })
}

/// `site_id/antenna` label used as a map key in reports
pub fn deployment_key(deployment: &Deployment) -> String {
    format!("{}/{}", deployment.site_id, deployment.antenna)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{assign, CandidateSite, Customer};
    use proptest::prelude::*;

    fn scenario_strategy() -> impl Strategy<Value = (Vec<Customer>, Vec<CandidateSite>)> {
        let point = (-0.002f64..0.002, -0.002f64..0.002);
        (
            prop::collection::vec(point.clone(), 0..15),
            prop::collection::vec(point, 0..6),
        )
            .prop_map(|(cs, ss)| {
                let customers = cs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (lat, lon))| Customer::new(format!("c{}", i), lat, lon))
                    .collect();
                let sites = ss
                    .into_iter()
                    .enumerate()
                    .map(|(i, (lat, lon))| CandidateSite::new(format!("s{}", i), lat, lon))
                    .collect();
                (customers, sites)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn deployments_come_from_assignment((customers, sites) in scenario_strategy()) {
            let catalog = AntennaCatalog::standard();
            let assignment = assign(&customers, &sites, &catalog);
            let reduction = reduce(&assignment, &catalog).unwrap();

            prop_assert!(reduction.deployments.len() <= assignment.len());
            for deployment in &reduction.deployments {
                prop_assert!(assignment.iter().any(|(_, a)| &a.deployment == deployment));
            }

            let expected_cost: f64 = reduction
                .deployments
                .iter()
                .map(|d| catalog.get(d.antenna).unwrap().cost)
                .sum();
            prop_assert_eq!(reduction.metrics.total_cost, expected_cost);
        }

        #[test]
        fn reduce_is_idempotent((customers, sites) in scenario_strategy()) {
            let catalog = AntennaCatalog::standard();
            let assignment = assign(&customers, &sites, &catalog);

            let first = reduce(&assignment, &catalog).unwrap();
            let second = reduce(&assignment, &catalog).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
