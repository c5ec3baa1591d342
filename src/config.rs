use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::chart::CHART_PREVIEW_ROWS;
use crate::data::exporter::ExportFormat;

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "DATA_SWEEPER_CONFIG";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Read-only startup settings. Every field has a default, so a partial
/// file such as `{ "chart_rows": 10 }` is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SweeperConfig {
    /// Rows shown in the preview table.
    pub preview_rows: usize,
    /// Rows fed to the bar chart.
    pub chart_rows: usize,
    /// Export format selected for newly added files.
    pub default_export: ExportFormat,
    /// Starting directory of the open / save dialogs.
    pub start_dir: Option<PathBuf>,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            chart_rows: CHART_PREVIEW_ROWS,
            default_export: ExportFormat::Csv,
            start_dir: None,
        }
    }
}

impl SweeperConfig {
    /// Load from `$DATA_SWEEPER_CONFIG`, falling back to defaults when the
    /// variable is unset or the file is unusable.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded settings from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SweeperConfig::from_json(r#"{ "chart_rows": 10 }"#).unwrap();
        assert_eq!(config.chart_rows, 10);
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.default_export, ExportFormat::Csv);
    }

    #[test]
    fn test_export_alias() {
        let config = SweeperConfig::from_json(r#"{ "default_export": "xlsx" }"#).unwrap();
        assert_eq!(config.default_export, ExportFormat::Spreadsheet);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(SweeperConfig::from_json("{ chart_rows: ").is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = SweeperConfig::from_file(Path::new("/nonexistent/sweeper.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading"));
    }
}
