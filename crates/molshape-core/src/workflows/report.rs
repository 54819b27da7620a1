use super::classify::{ClassificationResult, Outcome};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush report: {0}")]
    Io(#[from] std::io::Error),
}

/// One CSV record per input line. Descriptor columns stay empty for lines
/// that failed.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    line: usize,
    name: &'a str,
    status: &'static str,
    identifier: Option<&'a str>,
    category: Option<&'static str>,
    ring_count: Option<usize>,
    rotatable_bonds: Option<usize>,
    atom_count: Option<usize>,
    detail: Option<&'a str>,
}

impl<'a> From<&'a ClassificationResult> for ReportRow<'a> {
    fn from(result: &'a ClassificationResult) -> Self {
        let line = result.line.position + 1;
        let name = result.line.text.as_str();
        match &result.outcome {
            Outcome::Classified(classification) => Self {
                line,
                name,
                status: "classified",
                identifier: Some(classification.identifier.as_str()),
                category: Some(classification.category.label()),
                ring_count: Some(classification.descriptors.ring_count),
                rotatable_bonds: Some(classification.descriptors.rotatable_bonds),
                atom_count: Some(classification.descriptors.atom_count),
                detail: None,
            },
            Outcome::Failed { failure, detail } => Self {
                line,
                name,
                status: failure.tag(),
                identifier: None,
                category: None,
                ring_count: None,
                rotatable_bonds: None,
                atom_count: None,
                detail: Some(detail.as_str()),
            },
        }
    }
}

/// Writes results as CSV with a header row, in the order given.
pub fn write_csv<W: Write>(writer: W, results: &[ClassificationResult]) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(ReportRow::from(result))?;
    }
    csv_writer.flush()?;
    Ok(())
}
