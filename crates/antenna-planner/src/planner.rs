//! End-to-end planning pass: assign, reduce, verify.

use crate::{
    assign, reduce, verify, AntennaCatalog, Assignment, CandidateSite, Customer, DeploymentSet,
    PlannerError, Reduction, Result, VerificationResult,
};
use tracing::info;

/// Everything produced by one planning pass
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub assignment: Assignment,
    pub reduction: Reduction,
    pub verification: VerificationResult,
}

impl PlanOutcome {
    pub fn is_fully_covered(&self) -> bool {
        self.verification.covered
    }

    pub fn gaps(&self) -> &[String] {
        self.assignment.gaps()
    }
}

/// Run the full pipeline over loaded inputs.
///
/// The assignment is computed once and the deployment set is derived from
/// it. Every assigned customer must still be covered by the reduced set,
/// otherwise the run fails with [`PlannerError::InconsistentState`]. The
/// reported verification runs over all customers, so known gaps show up
/// there without failing the run.
pub fn plan(
    customers: &[Customer],
    sites: &[CandidateSite],
    catalog: &AntennaCatalog,
) -> Result<PlanOutcome> {
    info!(
        "Planning coverage for {} customers from {} candidate sites",
        customers.len(),
        sites.len()
    );

    let assignment = assign(customers, sites, catalog);
    let reduction = reduce(&assignment, catalog)?;
    check_assigned_covered(customers, sites, &assignment, &reduction.deployments, catalog)?;
    let verification = verify(customers, sites, &reduction.deployments, catalog)?;

    Ok(PlanOutcome {
        assignment,
        reduction,
        verification,
    })
}

/// Fail if any assigned customer is out of reach of every deployment
fn check_assigned_covered(
    customers: &[Customer],
    sites: &[CandidateSite],
    assignment: &Assignment,
    deployments: &DeploymentSet,
    catalog: &AntennaCatalog,
) -> Result<()> {
    let assigned: Vec<Customer> = customers
        .iter()
        .filter(|c| assignment.is_assigned(&c.id))
        .cloned()
        .collect();

    match verify(&assigned, sites, deployments, catalog)?.first_uncovered {
        Some(customer_id) => Err(PlannerError::InconsistentState(format!(
            "customer {} was assigned but is not covered by the reduced deployments",
            customer_id
        ))),
        None => Ok(()),
    }
}
