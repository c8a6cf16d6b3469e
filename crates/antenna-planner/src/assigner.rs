//! Per-customer best antenna assignment
//!
//! Every customer independently scans all (site, type) combinations and
//! keeps the qualifying one with the highest throughput. A combination
//! qualifies when the customer lies within the type's radius of the site.
//!
//! Ties on throughput keep the first combination encountered, enumerating
//! sites in input order and types in catalog tier order. Cost never takes
//! part in selection.

use crate::reducer::Deployment;
use crate::{AntennaCatalog, AntennaSpec, CandidateSite, Customer};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// The (site, type) pair chosen for one customer
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedDeployment {
    pub deployment: Deployment,
    /// Customer to site distance in feet
    pub distance_ft: f64,
    pub throughput: f64,
}

/// Customer to deployment relation, at most one entry per customer.
///
/// Customers without any qualifying pair are kept as coverage gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    entries: Vec<(String, AssignedDeployment)>,
    index: HashMap<String, usize>,
    gaps: Vec<String>,
}

impl Assignment {
    pub fn get(&self, customer_id: &str) -> Option<&AssignedDeployment> {
        self.index.get(customer_id).map(|&i| &self.entries[i].1)
    }

    pub fn is_assigned(&self, customer_id: &str) -> bool {
        self.index.contains_key(customer_id)
    }

    /// Assigned customers in input order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssignedDeployment)> {
        self.entries.iter().map(|(id, a)| (id.as_str(), a))
    }

    /// Customers with no qualifying (site, type) pair, in input order
    pub fn gaps(&self) -> &[String] {
        &self.gaps
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, customer_id: String, assigned: Option<AssignedDeployment>) {
        if self.index.contains_key(&customer_id) || self.gaps.contains(&customer_id) {
            warn!(
                "Customer id {} repeated, keeping its first occurrence",
                customer_id
            );
            return;
        }
        match assigned {
            Some(a) => {
                self.index.insert(customer_id.clone(), self.entries.len());
                self.entries.push((customer_id, a));
            }
            None => self.gaps.push(customer_id),
        }
    }
}

impl FromIterator<(String, Option<AssignedDeployment>)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (String, Option<AssignedDeployment>)>>(iter: I) -> Self {
        let mut assignment = Assignment::default();
        for (customer_id, assigned) in iter {
            assignment.push(customer_id, assigned);
        }
        assignment
    }
}

/// Assign every customer its highest-throughput qualifying deployment.
///
/// Customer ids are expected to be unique, as the loader guarantees. When an
/// id repeats, only its first occurrence is planned and the rest are logged
/// and skipped.
pub fn assign(
    customers: &[Customer],
    sites: &[CandidateSite],
    catalog: &AntennaCatalog,
) -> Assignment {
    info!(
        "Assigning {} customers across {} sites x {} antenna types",
        customers.len(),
        sites.len(),
        catalog.len()
    );

    let assignment: Assignment = customers
        .iter()
        .map(|customer| {
            let best = best_deployment(customer, sites, catalog);
            match &best {
                Some(a) => debug!(
                    "Customer {} -> {} {} ({:.1} ft, throughput {})",
                    customer.id,
                    a.deployment.site_id,
                    a.deployment.antenna,
                    a.distance_ft,
                    a.throughput
                ),
                None => debug!("Customer {} has no site in range", customer.id),
            }
            (customer.id.clone(), best)
        })
        .collect();

    info!(
        "Assigned {} customers, {} coverage gaps",
        assignment.len(),
        assignment.gaps().len()
    );

    assignment
}

/// Best qualifying (site, type) pair for one customer
pub fn best_deployment(
    customer: &Customer,
    sites: &[CandidateSite],
    catalog: &AntennaCatalog,
) -> Option<AssignedDeployment> {
    let max_range_ft = catalog.max_range_ft();

    sites
        .iter()
        .map(move |site| (site, customer.location.distance_ft(&site.location)))
        // No tier reaches past the widest radius
        .filter(move |(_, distance_ft)| *distance_ft <= max_range_ft)
        .flat_map(move |(site, distance_ft)| {
            catalog
                .iter()
                .filter(move |spec| spec.reaches(distance_ft))
                .map(move |spec| (site, spec, distance_ft))
        })
        .fold(
            None,
            |best: Option<(&CandidateSite, &AntennaSpec, f64)>, candidate| match best {
                // Strictly greater replaces, so the earliest maximum wins
                Some(b) if b.1.throughput >= candidate.1.throughput => Some(b),
                _ => Some(candidate),
            },
        )
        .map(|(site, spec, distance_ft)| AssignedDeployment {
            deployment: Deployment::new(site.id.clone(), spec.antenna),
            distance_ft,
            throughput: spec.throughput,
        })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    // Points within ~0.003 deg (~1,100 ft) of the origin so that the
    // standard 100-500 ft tiers produce a mix of hits and gaps
    fn point_strategy() -> impl Strategy<Value = (f64, f64)> {
        (-0.003f64..0.003, -0.003f64..0.003)
    }

    fn customers_strategy() -> impl Strategy<Value = Vec<Customer>> {
        prop::collection::vec(point_strategy(), 0..12).prop_map(|pts| {
            pts.into_iter()
                .enumerate()
                .map(|(i, (lat, lon))| Customer::new(format!("c{}", i), lat, lon))
                .collect()
        })
    }

    fn sites_strategy() -> impl Strategy<Value = Vec<CandidateSite>> {
        prop::collection::vec(point_strategy(), 0..8).prop_map(|pts| {
            pts.into_iter()
                .enumerate()
                .map(|(i, (lat, lon))| CandidateSite::new(format!("s{}", i), lat, lon))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn assigned_pairs_are_feasible(
            customers in customers_strategy(),
            sites in sites_strategy(),
        ) {
            let catalog = AntennaCatalog::standard();
            let assignment = assign(&customers, &sites, &catalog);

            for customer in &customers {
                if let Some(a) = assignment.get(&customer.id) {
                    let site = sites.iter().find(|s| s.id == a.deployment.site_id).unwrap();
                    let spec = catalog.get(a.deployment.antenna).unwrap();
                    prop_assert!(customer.location.distance_ft(&site.location) <= spec.range_ft);
                }
            }
        }

        #[test]
        fn feasible_customers_are_assigned_at_max_throughput(
            customers in customers_strategy(),
            sites in sites_strategy(),
        ) {
            let catalog = AntennaCatalog::standard();
            let assignment = assign(&customers, &sites, &catalog);

            for customer in &customers {
                let best_possible = sites
                    .iter()
                    .flat_map(|s| {
                        let d = customer.location.distance_ft(&s.location);
                        catalog.iter().filter(move |spec| spec.reaches(d))
                    })
                    .map(|spec| spec.throughput)
                    .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))));

                match best_possible {
                    Some(max) => {
                        let a = assignment.get(&customer.id);
                        prop_assert!(a.is_some());
                        prop_assert_eq!(a.unwrap().throughput, max);
                    }
                    None => prop_assert!(assignment.gaps().contains(&customer.id)),
                }
            }
            prop_assert_eq!(assignment.len() + assignment.gaps().len(), customers.len());
        }
    }
}
