//! CSV ingest of review files and export of classification results.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::domain::ClassificationResult;
use crate::error::{FeedbackError, InputError, Result};

/// Column headers of the exported results file.
pub const RESULT_COLUMNS: [&str; 3] = ["Review", "Predicted_Sentiment", "Predicted_Issue"];

/// Default file name of the exported results.
pub const RESULTS_FILE_NAME: &str = "analyzed_feedback.csv";

/// Default file name of the PDF report.
pub const REPORT_FILE_NAME: &str = "feedback_analysis_report.pdf";

/// A CSV file with a header row, held in memory.
///
/// Short rows are padded with empty cells so every row has one value per
/// column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReviewTable {
    /// Parse CSV from any reader. The first record is the header row.
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, InputError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(InputError::MissingHeader);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Read and parse a CSV file.
    pub fn from_path(path: &Path) -> std::result::Result<Self, InputError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn columns(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows.
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Values of `column`, in file order.
    pub fn reviews(&self, column: &str) -> std::result::Result<Vec<String>, InputError> {
        let idx = self
            .headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| InputError::MissingColumn {
                column: column.to_string(),
                available: self.headers.clone(),
            })?;

        Ok(self.rows.iter().map(|row| row[idx].clone()).collect())
    }
}

/// Write results as CSV: a header row, then one row per result in order.
pub fn write_results<W: Write>(writer: W, results: &[ClassificationResult]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(RESULT_COLUMNS).map_err(export_error)?;
    for result in results {
        writer
            .write_record([
                result.review(),
                result.sentiment().label(),
                result.issue_label(),
            ])
            .map_err(export_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Results as UTF-8 CSV bytes.
pub fn results_to_csv(results: &[ClassificationResult]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_results(&mut buf, results)?;
    Ok(buf)
}

fn export_error(err: csv::Error) -> FeedbackError {
    FeedbackError::Export(err.to_string())
}
