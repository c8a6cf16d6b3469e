//! Solution file I/O
//!
//! The solution file has no header and two columns per row:
//! `site_id,antenna_type`.

use crate::{AntennaType, Deployment, DeploymentSet, PlannerError, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Write deployments to any sink, one row each, in set order
pub fn write_deployments_to<W: Write>(writer: W, deployments: &DeploymentSet) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    for deployment in deployments {
        wtr.write_record([deployment.site_id.as_str(), deployment.antenna.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the solution file
pub fn write_deployments(path: impl AsRef<Path>, deployments: &DeploymentSet) -> Result<()> {
    let path = path.as_ref();
    info!("Writing {} deployments to {:?}", deployments.len(), path);

    let file = File::create(path)?;
    write_deployments_to(file, deployments)
}

/// Read a previously written solution
pub fn read_deployments_from<R: Read>(reader: R, source_name: &str) -> Result<DeploymentSet> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut deployments = DeploymentSet::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = record.position().map(|p| p.line()).unwrap_or(i as u64 + 1);
        let invalid = |reason: String| PlannerError::InvalidInput {
            source_name: source_name.to_string(),
            row,
            reason,
        };

        if record.len() != 2 {
            return Err(invalid(format!("expected 2 columns, got {}", record.len())));
        }
        let site_id = &record[0];
        if site_id.is_empty() {
            return Err(invalid("empty site identifier".to_string()));
        }
        let antenna: AntennaType = record[1].parse().map_err(invalid)?;

        deployments.insert(Deployment::new(site_id, antenna));
    }

    Ok(deployments)
}

/// Read a solution file
pub fn read_deployments(path: impl AsRef<Path>) -> Result<DeploymentSet> {
    let path = path.as_ref();
    info!("Reading deployments from {:?}", path);

    let file = File::open(path)?;
    let deployments = read_deployments_from(file, &path.display().to_string())?;

    info!("Read {} deployments", deployments.len());
    Ok(deployments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample() -> DeploymentSet {
        [
            Deployment::new("a-2", AntennaType::T3),
            Deployment::new("a-1", AntennaType::T1),
            Deployment::new("a-1", AntennaType::T5),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_write_format() {
        let mut buf = Vec::new();
        write_deployments_to(&mut buf, &sample()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "a-1,T-1\na-1,T-5\na-2,T-3\n");
    }

    #[test]
    fn test_file_round_trip() {
        let file = NamedTempFile::new().unwrap();
        write_deployments(file.path(), &sample()).unwrap();

        let read_back = read_deployments(file.path()).unwrap();
        assert_eq!(read_back, sample());
    }

    #[test]
    fn test_empty_set_writes_empty_file() {
        let mut buf = Vec::new();
        write_deployments_to(&mut buf, &DeploymentSet::new()).unwrap();
        assert!(buf.is_empty());
        assert!(read_deployments_from(buf.as_slice(), "mem").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_unknown_antenna_type() {
        let err = read_deployments_from("a-1,T-1\na-2,X-9\n".as_bytes(), "mem").unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput { row: 2, .. }));
    }

    #[test]
    fn test_rejects_wrong_column_count() {
        assert!(read_deployments_from("a-1,T-1,extra\n".as_bytes(), "mem").is_err());
        assert!(read_deployments_from("a-1\n".as_bytes(), "mem").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn deployment_strategy() -> impl Strategy<Value = Deployment> {
        ("[a-z0-9][a-z0-9_-]{0,12}", 0usize..AntennaType::ALL.len())
            .prop_map(|(site, tier)| Deployment::new(site, AntennaType::ALL[tier]))
    }

    proptest! {
        #[test]
        fn export_then_import_preserves_set(
            deployments in prop::collection::btree_set(deployment_strategy(), 0..40)
        ) {
            let mut buf = Vec::new();
            write_deployments_to(&mut buf, &deployments).unwrap();
            let read_back = read_deployments_from(buf.as_slice(), "mem").unwrap();
            prop_assert_eq!(read_back, deployments);
        }
    }
}
