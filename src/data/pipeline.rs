use std::fmt;

use super::chart::{summarize_for_chart_rows, ChartSummary, CHART_PREVIEW_ROWS};
use super::cleaner::{clean, CleaningOptions, CleaningReport};
use super::error::{Result, SweepError};
use super::exporter::{export, ExportArtifact, ExportFormat};
use super::loader::load_upload;
use super::model::TabularDataset;
use super::selector::select;

// ---------------------------------------------------------------------------
// Uploaded file
// ---------------------------------------------------------------------------

/// Stable identifier of an uploaded file for the lifetime of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw upload: name (with extension) and content. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    id: FileId,
    name: String,
    bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(id: FileId, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedFile {
            id,
            name: name.into(),
            bytes,
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

// ---------------------------------------------------------------------------
// Request / outcome
// ---------------------------------------------------------------------------

/// Every option for one processing pass of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRequest {
    pub cleaning: CleaningOptions,
    /// Columns to keep; `None` keeps all of them.
    pub columns: Option<Vec<String>>,
    pub visualize: bool,
    pub export: Option<ExportFormat>,
    pub chart_rows: usize,
}

impl Default for SweepRequest {
    fn default() -> Self {
        Self {
            cleaning: CleaningOptions::default(),
            columns: None,
            visualize: false,
            export: None,
            chart_rows: CHART_PREVIEW_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    pub dataset: TabularDataset,
    pub cleaning: CleaningReport,
    pub chart: Option<ChartSummary>,
    pub export: Option<ExportArtifact>,
}

/// Result of one file inside a batch.
#[derive(Debug)]
pub struct FileReport {
    pub file_id: FileId,
    pub file_name: String,
    pub result: Result<SweepOutcome>,
}

// ---------------------------------------------------------------------------
// Processing
// ---------------------------------------------------------------------------

/// Run load → clean → select → chart → export for one file.
///
/// Pure with respect to everything but the returned value, so re-running
/// with the same request yields the same outcome.
pub fn process(file: &UploadedFile, request: &SweepRequest) -> Result<SweepOutcome> {
    let mut dataset = load_upload(file)?;

    let cleaning = clean(&mut dataset, &request.cleaning);

    if let Some(columns) = &request.columns {
        select(&mut dataset, columns.as_slice())?;
    }

    let chart = request
        .visualize
        .then(|| summarize_for_chart_rows(&dataset, request.chart_rows));

    let artifact = request
        .export
        .map(|format| export(&dataset, format, file.name()))
        .transpose()?;

    Ok(SweepOutcome {
        dataset,
        cleaning,
        chart,
        export: artifact,
    })
}

/// Process files strictly in order. A failing file is reported and
/// skipped; it never stops the rest of the batch.
pub fn process_batch<'a, I>(jobs: I) -> Vec<FileReport>
where
    I: IntoIterator<Item = (&'a UploadedFile, &'a SweepRequest)>,
{
    jobs.into_iter()
        .map(|(file, request)| {
            let result = process(file, request);
            if let Err(e) = &result {
                log::debug!("Batch skipped {} ({}): {e}", file.name(), file.id());
            }
            FileReport {
                file_id: file.id(),
                file_name: file.name().to_string(),
                result,
            }
        })
        .collect()
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&SweepError> {
        self.result.as_ref().err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    const SALES: &str = "region,units,note\nNorth,10,ok\nSouth,,late\nNorth,10,ok\nEast,30,ok\n";

    fn upload(id: u64, name: &str, body: &str) -> UploadedFile {
        UploadedFile::new(FileId(id), name, body.as_bytes().to_vec())
    }

    #[test]
    fn test_full_pass() {
        let file = upload(1, "sales.csv", SALES);
        let request = SweepRequest {
            cleaning: CleaningOptions {
                remove_duplicates: true,
                fill_missing_with_mean: true,
            },
            columns: Some(vec!["units".into(), "region".into()]),
            visualize: true,
            export: Some(ExportFormat::Csv),
            ..SweepRequest::default()
        };

        let outcome = process(&file, &request).unwrap();
        assert_eq!(outcome.cleaning.duplicates_removed, 1);
        assert_eq!(outcome.cleaning.cells_filled, 1);
        assert_eq!(outcome.dataset.column_names(), vec!["region", "units"]);
        assert_eq!(
            outcome.dataset.column("units").unwrap().cells,
            vec![
                CellValue::Number(10.0),
                CellValue::Number(20.0),
                CellValue::Number(30.0)
            ]
        );
        assert!(matches!(outcome.chart, Some(ChartSummary::Series(_))));

        let artifact = outcome.export.unwrap();
        assert_eq!(artifact.file_name, "sales.csv");
        assert_eq!(
            String::from_utf8(artifact.bytes).unwrap(),
            "region,units\nNorth,10\nSouth,20\nEast,30\n"
        );
    }

    #[test]
    fn test_default_request_only_loads() {
        let file = upload(1, "sales.csv", SALES);
        let outcome = process(&file, &SweepRequest::default()).unwrap();
        assert_eq!(outcome.dataset.row_count(), 4);
        assert!(outcome.chart.is_none());
        assert!(outcome.export.is_none());
    }

    #[test]
    fn test_process_is_repeatable() {
        let file = upload(1, "sales.csv", SALES);
        let request = SweepRequest {
            visualize: true,
            export: Some(ExportFormat::Spreadsheet),
            ..SweepRequest::default()
        };
        let first = process(&file, &request).unwrap();
        let second = process(&file, &request).unwrap();
        assert_eq!(first.dataset, second.dataset);
        assert_eq!(first.chart, second.chart);
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let good = upload(1, "a.csv", "x\n1\n");
        let bad = upload(2, "notes.txt", "hello");
        let stale = upload(3, "b.csv", "x\n1\n");
        let plain = SweepRequest::default();
        let narrowed = SweepRequest {
            columns: Some(vec!["y".into()]),
            ..SweepRequest::default()
        };

        let reports = process_batch([(&good, &plain), (&bad, &plain), (&stale, &narrowed)]);
        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_ok());
        assert_eq!(
            reports[1].error(),
            Some(&SweepError::UnsupportedFormat(".txt".into()))
        );
        assert_eq!(
            reports[2].error(),
            Some(&SweepError::UnknownColumn("y".into()))
        );
        assert_eq!(reports[2].file_id, FileId(3));
    }

    #[test]
    fn test_size_bytes() {
        assert_eq!(upload(1, "a.csv", "x\n1\n").size_bytes(), 4);
    }
}
