use std::collections::HashSet;
use std::io::Cursor;

use calamine::{Data, ExcelDateTime, Reader, Xlsx};

use super::error::{Result, SweepError};
use super::model::{CellValue, Column, TabularDataset};
use super::pipeline::UploadedFile;

/// Tokens read as the missing marker, matching the usual dataframe NA set.
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>",
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A parsed field that keeps its source text until the column kind is known.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Missing,
    Number(f64, String),
    Text(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse raw bytes into a dataset. Dispatch by declared extension.
///
/// Supported formats:
/// * `.csv`  – comma separated text, first row is the header
/// * `.xlsx` – first worksheet of the workbook, first row is the header
pub fn load(bytes: &[u8], declared_extension: &str) -> Result<TabularDataset> {
    let ext = declared_extension.trim_start_matches('.').to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(bytes)?,
        "xlsx" => load_xlsx(bytes)?,
        _ => return Err(SweepError::UnsupportedFormat(declared_extension.to_string())),
    };

    log::info!(
        "Parsed .{ext} content: {} rows x {} columns",
        dataset.row_count(),
        dataset.column_count()
    );
    Ok(dataset)
}

/// Load an uploaded file using the extension of its name.
pub fn load_upload(file: &UploadedFile) -> Result<TabularDataset> {
    load(file.bytes(), &extension_of(file.name()))
}

/// Lowercase trailing extension including the dot, or `""` if there is none.
///
/// A leading dot alone (`.env`) does not count as an extension.
pub fn extension_of(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(idx) if base[..idx].chars().any(|c| c != '.') => base[idx..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(bytes: &[u8]) -> Result<TabularDataset> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let raw_headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if raw_headers.is_empty() {
        return Err(SweepError::ParseError("No columns to parse from file".into()));
    }
    let headers = unique_headers(raw_headers);
    let width = headers.len();

    let mut columns: Vec<Vec<RawCell>> = vec![Vec::new(); width];

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            // Header is line 1, so data row `row_no` sits on line `row_no + 2`.
            return Err(SweepError::ParseError(format!(
                "Expected {width} fields in line {}, saw {}",
                row_no + 2,
                record.len()
            )));
        }
        for (col_idx, cells) in columns.iter_mut().enumerate() {
            let cell = record.get(col_idx).map_or(RawCell::Missing, guess_cell);
            cells.push(cell);
        }
    }

    Ok(build_dataset(headers, columns))
}

/// Interpret a text field: missing token, number, or verbatim text.
fn guess_cell(s: &str) -> RawCell {
    if is_missing_token(s) {
        return RawCell::Missing;
    }
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_nan() => RawCell::Missing,
        Ok(v) => RawCell::Number(v, s.to_string()),
        Err(_) => RawCell::Text(s.to_string()),
    }
}

fn is_missing_token(s: &str) -> bool {
    let trimmed = s.trim();
    MISSING_TOKENS.contains(&trimmed)
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

fn load_xlsx(bytes: &[u8]) -> Result<TabularDataset> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SweepError::ParseError("No worksheet found in workbook".into()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(TabularDataset::default());
    };

    let headers = unique_headers(header_row.iter().map(header_text).collect());
    let width = headers.len();
    let mut columns: Vec<Vec<RawCell>> = vec![Vec::new(); width];

    for row in rows {
        for (col_idx, cells) in columns.iter_mut().enumerate() {
            let cell = row.get(col_idx).map_or(RawCell::Missing, excel_cell);
            cells.push(cell);
        }
    }

    Ok(build_dataset(headers, columns))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn excel_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Int(i) => RawCell::Number(*i as f64, i.to_string()),
        Data::Float(f) if f.is_nan() => RawCell::Missing,
        Data::Float(f) => RawCell::Number(*f, f.to_string()),
        Data::String(s) if is_missing_token(s) => RawCell::Missing,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Bool(b) => RawCell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => RawCell::Text(excel_datetime_text(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Empty | Data::Error(_) => RawCell::Missing,
    }
}

/// `2024-01-15` for whole days, `2024-01-15 12:00:00` otherwise, and
/// `h:mm:ss` for durations. Serials outside chrono's range stay numeric text.
fn excel_datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(d) = dt.as_duration() {
            let secs = d.num_seconds();
            return format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60);
        }
    } else if let Some(value) = dt.as_datetime() {
        let text = value.format("%Y-%m-%d %H:%M:%S").to_string();
        return match text.strip_suffix(" 00:00:00") {
            Some(date) => date.to_string(),
            None => text,
        };
    }
    dt.as_f64().to_string()
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn build_dataset(headers: Vec<String>, columns: Vec<Vec<RawCell>>) -> TabularDataset {
    let row_count = columns.first().map_or(0, Vec::len);
    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(name, cells)| build_column(name, cells))
        .collect();
    TabularDataset::new(columns, row_count)
}

/// Settle a column's kind. Text columns get back the source text of every
/// cell that happened to parse as a number.
fn build_column(name: String, raw: Vec<RawCell>) -> Column {
    let numeric = raw.iter().all(|c| !matches!(c, RawCell::Text(_)));
    let cells = raw
        .into_iter()
        .map(|cell| match cell {
            RawCell::Missing => CellValue::Missing,
            RawCell::Number(v, _) if numeric => CellValue::Number(v),
            RawCell::Number(_, text) | RawCell::Text(text) => CellValue::Text(text),
        })
        .collect();
    Column::infer(name, cells)
}

/// Name blank headers `Unnamed: {i}` and suffix repeats with `.1`, `.2`, …
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let named: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(i, h)| if h.trim().is_empty() { format!("Unnamed: {i}") } else { h })
        .collect();

    let mut seen: HashSet<String> = HashSet::with_capacity(named.len());
    let mut out = Vec::with_capacity(named.len());
    for name in named {
        let mut candidate = name.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
