use std::fmt;

use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};

use super::error::{Result, SweepError};
use super::loader::extension_of;
use super::model::{CellValue, TabularDataset};

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// ---------------------------------------------------------------------------
// Export format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    #[serde(alias = "excel", alias = "xlsx")]
    Spreadsheet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Spreadsheet];

    pub fn suffix(self) -> &'static str {
        match self {
            ExportFormat::Csv => ".csv",
            ExportFormat::Spreadsheet => ".xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_CONTENT_TYPE,
            ExportFormat::Spreadsheet => XLSX_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Spreadsheet => write!(f, "Excel"),
        }
    }
}

/// An in-memory export, ready to be handed to a save dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub suffix: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Serialize `dataset` in `format`. Header row is the column names and no
/// index column is written. Nothing touches the filesystem.
pub fn export(
    dataset: &TabularDataset,
    format: ExportFormat,
    original_name: &str,
) -> Result<ExportArtifact> {
    let bytes = match format {
        ExportFormat::Csv => write_csv(dataset)?,
        ExportFormat::Spreadsheet => write_xlsx(dataset)?,
    };

    let file_name = export_file_name(original_name, format);
    log::info!("Exported {file_name} as {format} ({} bytes)", bytes.len());

    Ok(ExportArtifact {
        file_name,
        suffix: format.suffix(),
        content_type: format.content_type(),
        bytes,
    })
}

/// Swap the trailing extension of `original_name` for the format's suffix.
/// Earlier occurrences of the extension text are left alone.
pub fn export_file_name(original_name: &str, format: ExportFormat) -> String {
    let ext_len = extension_of(original_name).len();
    let stem = &original_name[..original_name.len() - ext_len];
    format!("{stem}{}", format.suffix())
}

fn write_csv(dataset: &TabularDataset) -> Result<Vec<u8>> {
    // With no columns there is no header and every record would come out as `""`.
    if dataset.column_count() == 0 {
        return Ok(Vec::new());
    }

    let export_err = |e: csv::Error| SweepError::ExportError(e.to_string());

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(dataset.columns().iter().map(|c| c.name.as_str()))
        .map_err(export_err)?;

    for row in 0..dataset.row_count() {
        let record: Vec<String> = dataset.row(row).iter().map(|c| c.to_string()).collect();
        writer.write_record(&record).map_err(export_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| SweepError::ExportError(e.to_string()))
}

fn write_xlsx(dataset: &TabularDataset) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col_idx, column) in dataset.columns().iter().enumerate() {
        let col = u16::try_from(col_idx)
            .map_err(|_| SweepError::ExportError(format!("too many columns ({col_idx})")))?;
        sheet.write_string(0, col, &column.name)?;

        for (row_idx, cell) in column.cells.iter().enumerate() {
            let row = u32::try_from(row_idx + 1)
                .map_err(|_| SweepError::ExportError(format!("too many rows ({row_idx})")))?;
            match cell {
                CellValue::Number(v) if v.is_finite() => {
                    sheet.write_number(row, col, *v)?;
                }
                // Workbooks cannot hold inf; write it as text.
                CellValue::Number(v) => {
                    sheet.write_string(row, col, v.to_string())?;
                }
                CellValue::Text(s) => {
                    sheet.write_string(row, col, s)?;
                }
                CellValue::Missing => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;
    use crate::data::model::Column;

    #[test]
    fn test_csv_round_trip() {
        let input = "name,qty,price\nApple,3,1.25\nPear,,0.5\n";
        let ds = load(input.as_bytes(), ".csv").unwrap();
        let out = export(&ds, ExportFormat::Csv, "fruit.csv").unwrap();
        assert_eq!(String::from_utf8(out.bytes).unwrap(), input);
        assert_eq!(out.content_type, "text/csv");
        assert_eq!(out.suffix, ".csv");
    }

    #[test]
    fn test_csv_round_trip_keeps_text_column_spelling() {
        let input = "code,label\n007,a\n1.0,b\nABC,c\n";
        let ds = load(input.as_bytes(), ".csv").unwrap();
        let out = export(&ds, ExportFormat::Csv, "codes.csv").unwrap();
        assert_eq!(String::from_utf8(out.bytes).unwrap(), input);

        let back = load(
            &export(&ds, ExportFormat::Spreadsheet, "codes.csv").unwrap().bytes,
            ".xlsx",
        )
        .unwrap();
        assert_eq!(back, ds);
    }

    #[test]
    fn test_zero_columns_export_is_empty() {
        let ds = TabularDataset::new(Vec::new(), 2);
        let out = export(&ds, ExportFormat::Csv, "none.csv").unwrap();
        assert!(out.bytes.is_empty());
    }

    #[test]
    fn test_xlsx_round_trip() {
        let input = "name,qty,price\nApple,3,1.25\nPear,,0.5\n";
        let ds = load(input.as_bytes(), ".csv").unwrap();

        let out = export(&ds, ExportFormat::Spreadsheet, "fruit.csv").unwrap();
        assert_eq!(out.file_name, "fruit.xlsx");
        assert_eq!(out.content_type, XLSX_CONTENT_TYPE);

        let back = load(&out.bytes, ".xlsx").unwrap();
        assert_eq!(back, ds);
    }

    #[test]
    fn test_empty_dataset_exports_header_only() {
        let ds = TabularDataset::from_columns(vec![
            Column::infer("a", Vec::new()),
            Column::infer("b", Vec::new()),
        ]);
        let out = export(&ds, ExportFormat::Csv, "empty.csv").unwrap();
        assert_eq!(String::from_utf8(out.bytes).unwrap(), "a,b\n");
    }

    #[test]
    fn test_text_with_commas_is_quoted() {
        let ds = TabularDataset::from_columns(vec![Column::infer(
            "city",
            vec![CellValue::Text("Paris, FR".into())],
        )]);
        let out = export(&ds, ExportFormat::Csv, "c.csv").unwrap();
        assert_eq!(String::from_utf8(out.bytes).unwrap(), "city\n\"Paris, FR\"\n");
    }

    #[test]
    fn test_file_name_replaces_only_trailing_extension() {
        assert_eq!(
            export_file_name("report.csv.csv.csv", ExportFormat::Spreadsheet),
            "report.csv.csv.xlsx"
        );
        assert_eq!(export_file_name("Sales.XLSX", ExportFormat::Csv), "Sales.csv");
        assert_eq!(export_file_name("noext", ExportFormat::Csv), "noext.csv");
    }

    #[test]
    fn test_format_from_config_names() {
        let f: ExportFormat = serde_json::from_str("\"excel\"").unwrap();
        assert_eq!(f, ExportFormat::Spreadsheet);
        let f: ExportFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(f, ExportFormat::Csv);
    }
}
