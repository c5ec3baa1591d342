use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;

use crate::config::SweeperConfig;
use crate::data::chart::ChartSummary;
use crate::data::cleaner::CleaningOptions;
use crate::data::error::SweepError;
use crate::data::exporter::{ExportArtifact, ExportFormat};
use crate::data::loader::load_upload;
use crate::data::model::TabularDataset;
use crate::data::pipeline::{
    process, process_batch, FileId, SweepOutcome, SweepRequest, UploadedFile,
};

// ---------------------------------------------------------------------------
// Banners
// ---------------------------------------------------------------------------

/// A message shown under a file, coloured by severity.
#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    Success(String),
    Warning(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Per-file session
// ---------------------------------------------------------------------------

/// Everything the UI knows about one uploaded file.
pub struct FileSession {
    pub upload: UploadedFile,
    /// Dataset as parsed on upload, used for the preview and column list.
    pub loaded: Result<TabularDataset, SweepError>,

    pub clean_enabled: bool,
    pub cleaning: CleaningOptions,
    pub selected_columns: BTreeSet<String>,
    pub visualize: bool,
    pub export_format: ExportFormat,

    /// Result of the last explicit Apply / Convert.
    pub outcome: Option<SweepOutcome>,
    pub banners: Vec<Banner>,
}

impl FileSession {
    pub fn new(upload: UploadedFile, export_format: ExportFormat) -> Self {
        let loaded = load_upload(&upload);
        let (selected_columns, banners) = match &loaded {
            Ok(ds) => (ds.column_names().into_iter().collect(), Vec::new()),
            Err(e) => {
                log::error!("Error reading file {}: {e}", upload.name());
                (
                    BTreeSet::new(),
                    vec![Banner::Error(format!("Error reading file {}: {e}", upload.name()))],
                )
            }
        };

        Self {
            upload,
            loaded,
            clean_enabled: false,
            cleaning: CleaningOptions::default(),
            selected_columns,
            visualize: false,
            export_format,
            outcome: None,
            banners,
        }
    }

    pub fn id(&self) -> FileId {
        self.upload.id()
    }

    pub fn size_kb(&self) -> f64 {
        self.upload.size_bytes() as f64 / 1024.0
    }

    /// Dataset to preview: the last processed one, else the raw upload.
    pub fn preview_dataset(&self) -> Option<&TabularDataset> {
        self.outcome
            .as_ref()
            .map(|o| &o.dataset)
            .or(self.loaded.as_ref().ok())
    }

    pub fn chart(&self) -> Option<&ChartSummary> {
        self.outcome.as_ref().and_then(|o| o.chart.as_ref())
    }

    /// Cleaning toggles only count while "Clean data" is ticked.
    pub fn effective_cleaning(&self) -> CleaningOptions {
        if self.clean_enabled {
            self.cleaning
        } else {
            CleaningOptions::default()
        }
    }

    /// Snapshot the current widget values into one request.
    pub fn request(&self, chart_rows: usize, export: Option<ExportFormat>) -> SweepRequest {
        let columns = self
            .loaded
            .as_ref()
            .ok()
            .map(|_| self.selected_columns.iter().cloned().collect());

        SweepRequest {
            cleaning: self.effective_cleaning(),
            columns,
            visualize: self.visualize,
            export,
            chart_rows,
        }
    }

    pub fn toggle_column(&mut self, name: &str) {
        if !self.selected_columns.remove(name) {
            self.selected_columns.insert(name.to_string());
        }
    }

    pub fn select_all_columns(&mut self) {
        if let Ok(ds) = &self.loaded {
            self.selected_columns = ds.column_names().into_iter().collect();
        }
    }

    pub fn select_no_columns(&mut self) {
        self.selected_columns.clear();
    }

    /// Store a pipeline result and rebuild the banners from it.
    fn record(&mut self, result: Result<SweepOutcome, SweepError>) {
        self.banners.clear();
        match result {
            Ok(outcome) => {
                let options = self.effective_cleaning();
                if options.remove_duplicates {
                    self.banners.push(Banner::Success(format!(
                        "Duplicates removed ({} rows)",
                        outcome.cleaning.duplicates_removed
                    )));
                }
                if options.fill_missing_with_mean {
                    self.banners.push(Banner::Success(format!(
                        "Missing values filled with average ({} cells)",
                        outcome.cleaning.cells_filled
                    )));
                }
                if outcome.chart == Some(ChartSummary::NoNumericColumns) {
                    self.banners.push(Banner::Warning(
                        "No numeric columns available for visualization.".into(),
                    ));
                }
                if let Some(artifact) = &outcome.export {
                    self.banners.push(Banner::Success(format!(
                        "Converted to {} ({})",
                        artifact.file_name, artifact.content_type
                    )));
                }
                self.outcome = Some(outcome);
            }
            Err(e) => {
                log::warn!("Processing {} ({}) failed: {e}", self.upload.name(), self.id());
                self.banners
                    .push(Banner::Error(format!("{}: {e}", self.upload.name())));
                self.outcome = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: SweeperConfig,

    /// Uploaded files in upload order.
    pub files: Vec<FileSession>,

    /// File shown in the central panel.
    pub active: Option<FileId>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<Banner>,

    next_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SweeperConfig::default())
    }
}

impl AppState {
    pub fn new(config: SweeperConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            active: None,
            status_message: None,
            next_id: 1,
        }
    }

    /// Register an upload and parse it for preview. Returns its id.
    pub fn add_upload(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> FileId {
        let id = FileId(self.next_id);
        self.next_id += 1;

        let upload = UploadedFile::new(id, name, bytes);
        log::info!("Added {} ({} bytes) as {id}", upload.name(), upload.size_bytes());

        self.files
            .push(FileSession::new(upload, self.config.default_export));
        self.active = Some(id);
        id
    }

    /// Read a file from disk and add it as an upload.
    pub fn open_path(&mut self, path: &Path) -> anyhow::Result<FileId> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.add_upload(name, bytes))
    }

    pub fn remove_file(&mut self, id: FileId) {
        self.files.retain(|f| f.id() != id);
        if self.active == Some(id) {
            self.active = self.files.first().map(FileSession::id);
        }
    }

    pub fn session(&self, id: FileId) -> Option<&FileSession> {
        self.files.iter().find(|f| f.id() == id)
    }

    pub fn session_mut(&mut self, id: FileId) -> Option<&mut FileSession> {
        self.files.iter_mut().find(|f| f.id() == id)
    }

    pub fn active_session(&self) -> Option<&FileSession> {
        self.active.and_then(|id| self.session(id))
    }

    /// Run the pipeline once for one file with its current options.
    pub fn apply(&mut self, id: FileId) {
        let chart_rows = self.config.chart_rows;
        if let Some(session) = self.session_mut(id) {
            let request = session.request(chart_rows, None);
            let result = process(&session.upload, &request);
            session.record(result);
        }
    }

    /// Apply every file's current options, in upload order.
    pub fn apply_all(&mut self) {
        let chart_rows = self.config.chart_rows;
        let requests: Vec<SweepRequest> = self
            .files
            .iter()
            .map(|f| f.request(chart_rows, None))
            .collect();

        let reports = process_batch(self.files.iter().map(|f| &f.upload).zip(requests.iter()));

        let failed = reports.iter().filter(|r| !r.is_ok()).count();
        for report in reports {
            if let Some(session) = self.session_mut(report.file_id) {
                session.record(report.result);
            }
        }

        self.status_message = Some(if failed == 0 {
            Banner::Success("All files processed successfully!".into())
        } else {
            Banner::Error(format!("{failed} file(s) could not be processed"))
        });
    }

    /// Run the pipeline with export for one file and hand back the buffer.
    pub fn convert(&mut self, id: FileId) -> Option<ExportArtifact> {
        let chart_rows = self.config.chart_rows;
        let session = self.session_mut(id)?;
        let request = session.request(chart_rows, Some(session.export_format));
        let result = process(&session.upload, &request);
        session.record(result);
        session.outcome.as_ref().and_then(|o| o.export.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &[u8] = b"city,temp\nOslo,\nRome,20\nRome,20\nLima,10\n";

    #[test]
    fn test_add_upload_selects_all_columns() {
        let mut state = AppState::default();
        let id = state.add_upload("weather.csv", CSV.to_vec());
        let session = state.session(id).unwrap();
        assert_eq!(state.active, Some(id));
        assert!(session.loaded.is_ok());
        assert_eq!(session.selected_columns.len(), 2);
        assert!(session.banners.is_empty());
    }

    #[test]
    fn test_unsupported_upload_shows_error() {
        let mut state = AppState::default();
        let id = state.add_upload("notes.txt", b"hello".to_vec());
        let session = state.session(id).unwrap();
        assert!(matches!(session.loaded, Err(SweepError::UnsupportedFormat(_))));
        assert!(matches!(session.banners[0], Banner::Error(_)));
    }

    #[test]
    fn test_cleaning_ignored_unless_enabled() {
        let mut state = AppState::default();
        let id = state.add_upload("weather.csv", CSV.to_vec());
        let session = state.session_mut(id).unwrap();
        session.cleaning.remove_duplicates = true;
        assert!(session.request(5, None).cleaning.is_noop());

        session.clean_enabled = true;
        state.apply(id);
        let outcome = state.session(id).unwrap().outcome.as_ref().unwrap();
        assert_eq!(outcome.cleaning.duplicates_removed, 1);
        assert_eq!(outcome.dataset.row_count(), 3);
    }

    #[test]
    fn test_visualize_text_only_warns() {
        let mut state = AppState::default();
        let id = state.add_upload("weather.csv", CSV.to_vec());
        let session = state.session_mut(id).unwrap();
        session.toggle_column("temp");
        session.visualize = true;
        state.apply(id);

        let session = state.session(id).unwrap();
        assert_eq!(session.chart(), Some(&ChartSummary::NoNumericColumns));
        assert!(session
            .banners
            .iter()
            .any(|b| matches!(b, Banner::Warning(_))));
    }

    #[test]
    fn test_convert_returns_artifact() {
        let mut state = AppState::default();
        let id = state.add_upload("weather.csv", CSV.to_vec());
        state.session_mut(id).unwrap().export_format = ExportFormat::Spreadsheet;

        let artifact = state.convert(id).unwrap();
        assert_eq!(artifact.file_name, "weather.xlsx");
        assert!(!artifact.bytes.is_empty());
    }

    #[test]
    fn test_apply_all_reports_failures() {
        let mut state = AppState::default();
        state.add_upload("weather.csv", CSV.to_vec());
        state.add_upload("broken.xlsx", b"not a workbook".to_vec());
        state.apply_all();

        assert_eq!(
            state.status_message,
            Some(Banner::Error("1 file(s) could not be processed".into()))
        );
        assert!(state.files[0].outcome.is_some());
        assert!(state.files[1].outcome.is_none());
    }

    #[test]
    fn test_apply_failure_clears_outcome_and_banners_error() {
        let mut state = AppState::default();
        let good = state.add_upload("weather.csv", CSV.to_vec());
        state.apply(good);
        assert!(state.session(good).unwrap().outcome.is_some());

        let bad = state.add_upload("broken.xlsx", b"not a workbook".to_vec());
        state.apply(bad);
        let session = state.session(bad).unwrap();
        assert!(session.outcome.is_none());
        assert_eq!(session.banners.len(), 1);
        assert!(matches!(&session.banners[0], Banner::Error(msg) if msg.starts_with("broken.xlsx: ")));
        assert!(state.convert(bad).is_none());
    }

    #[test]
    fn test_remove_file_moves_active() {
        let mut state = AppState::default();
        let first = state.add_upload("a.csv", b"x\n1\n".to_vec());
        let second = state.add_upload("b.csv", b"x\n2\n".to_vec());
        state.remove_file(second);
        assert_eq!(state.active, Some(first));
        assert!(state.session(second).is_none());
    }
}
