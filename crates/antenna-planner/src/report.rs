//! Run diagnostics: log summary and JSON report

use crate::reducer::DeploymentMetrics;
use crate::{Deployment, PlanOutcome, Result, VerificationResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub generated_at: String,
    pub customer_count: usize,
    pub site_count: usize,
    pub metrics: DeploymentMetrics,
    pub verification: VerificationResult,
    pub coverage_gaps: Vec<String>,
    pub deployments: Vec<Deployment>,
}

impl PlanReport {
    pub fn new(outcome: &PlanOutcome, customer_count: usize, site_count: usize) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            customer_count,
            site_count,
            metrics: outcome.reduction.metrics.clone(),
            verification: outcome.verification.clone(),
            coverage_gaps: outcome.gaps().to_vec(),
            deployments: outcome.reduction.deployments.iter().cloned().collect(),
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Writing report to {:?}", path);

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Emit the human-readable run summary
pub fn log_summary(outcome: &PlanOutcome) {
    let metrics = &outcome.reduction.metrics;

    info!("{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!("Deployments: {}", metrics.deployment_count);
    info!("Total cost: {:.2}", metrics.total_cost);
    info!(
        "Customers served: {} (total throughput {:.2})",
        metrics.customers_served, metrics.total_throughput
    );

    for customer_id in outcome.gaps() {
        warn!("No antenna found for customer {}", customer_id);
    }

    if outcome.is_fully_covered() {
        info!("Coverage: PASS");
    } else {
        warn!(
            "Coverage: FAIL (first uncovered: {})",
            outcome
                .verification
                .first_uncovered
                .as_deref()
                .unwrap_or("unknown")
        );
    }
}
