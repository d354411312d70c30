use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

pub const LOAN_STATUS_COLUMN: &str = "Loan Status";

/// Errors raised while summarizing the reference dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read reference dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid reference dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("reference dataset has no 'Loan Status' column")]
    MissingStatusColumn,
}

/// Record counts from the historical dataset the model was trained on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub approved: usize,
    pub rejected: usize,
    pub unrecognized: usize,
}

impl DatasetSummary {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let summary = Self::from_reader(std::io::BufReader::new(file))?;
        info!(
            path = %path.display(),
            total = summary.total_records,
            approved = summary.approved,
            "summarized reference dataset"
        );
        Ok(summary)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let status_index = csv_reader
            .headers()?
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}') == LOAN_STATUS_COLUMN)
            .ok_or(DatasetError::MissingStatusColumn)?;

        let mut summary = Self::default();
        for record in csv_reader.records() {
            let record = record?;
            summary.total_records += 1;
            match record.get(status_index) {
                Some("Approved") => summary.approved += 1,
                Some("Rejected") => summary.rejected += 1,
                _ => summary.unrecognized += 1,
            }
        }

        if summary.unrecognized > 0 {
            warn!(
                unrecognized = summary.unrecognized,
                "reference dataset has loan status values other than Approved/Rejected"
            );
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_total_and_approved_records() {
        let csv = "Loan ID,Loan Status,Term\n\
                   1,Approved,Short\n\
                   2,Rejected,Long\n\
                   3,Approved,Short\n\
                   4,,Short\n";
        let summary = DatasetSummary::from_reader(csv.as_bytes()).expect("summary builds");
        assert_eq!(
            summary,
            DatasetSummary {
                total_records: 4,
                approved: 2,
                rejected: 1,
                unrecognized: 1,
            }
        );
    }

    #[test]
    fn missing_status_column_is_reported() {
        let error = DatasetSummary::from_reader("Loan ID,Term\n1,Short\n".as_bytes())
            .expect_err("status column required");
        assert!(matches!(error, DatasetError::MissingStatusColumn));
    }
}
