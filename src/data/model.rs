use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column
// ---------------------------------------------------------------------------

/// A scalar cell. `Missing` is the explicit absence marker and is never
/// the same thing as `0` or `""`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

// -- Manual Eq/Hash so rows can be collected into a HashSet --
//
// Numbers compare by bit pattern, with -0.0 folded onto 0.0 and every NaN
// folded onto one canonical NaN.

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Number(u64),
    Text(&'a str),
    Missing,
}

impl CellValue {
    /// Hashable identity of the cell, used for duplicate detection.
    pub fn key(&self) -> CellKey<'_> {
        match self {
            CellValue::Number(v) => CellKey::Number(canonical_bits(*v)),
            CellValue::Text(s) => CellKey::Text(s),
            CellValue::Missing => CellKey::Missing,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // `f64`'s Display is the shortest text that parses back to the same value.
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "number"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// One named column with a single inferred kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, cells: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Build a column from raw cells, inferring its kind.
    ///
    /// A column is numeric when every non-missing cell is a number, which
    /// includes a column that is entirely missing.
    pub fn infer(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let numeric = cells
            .iter()
            .all(|c| matches!(c, CellValue::Number(_) | CellValue::Missing));
        let kind = if numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        };
        Column::new(name, kind, cells)
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }
}

// ---------------------------------------------------------------------------
// TabularDataset
// ---------------------------------------------------------------------------

/// Ordered named columns of equal length.
///
/// The row count is stored explicitly so that a dataset keeps its height
/// after every column has been deselected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularDataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl TabularDataset {
    /// Assemble a dataset. Panics if the columns differ in length, which
    /// would be a bug in the caller rather than bad input.
    pub fn new(columns: Vec<Column>, row_count: usize) -> Self {
        assert!(
            columns.iter().all(|c| c.cells.len() == row_count),
            "all columns must have {row_count} cells"
        );
        TabularDataset { columns, row_count }
    }

    pub fn from_columns(columns: Vec<Column>) -> Self {
        let row_count = columns.first().map_or(0, |c| c.cells.len());
        Self::new(columns, row_count)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Cells of row `index`, in column order.
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.cells[index]).collect()
    }

    /// Keep only rows whose flag in `keep` is true.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.row_count);
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.cells.retain(|_| *flags.next().unwrap_or(&false));
        }
        self.row_count = keep.iter().filter(|k| **k).count();
    }

    /// Keep only columns whose flag in `keep` is true. Row count is untouched.
    pub fn retain_columns(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.columns.retain(|_| *flags.next().unwrap_or(&false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_numeric_with_missing() {
        let col = Column::infer(
            "a",
            vec![CellValue::Number(1.0), CellValue::Missing],
        );
        assert_eq!(col.kind, ColumnKind::Numeric);
        assert_eq!(col.missing_count(), 1);
    }

    #[test]
    fn test_infer_text_when_mixed() {
        let col = Column::infer(
            "a",
            vec![CellValue::Number(1.0), CellValue::Text("x".into())],
        );
        assert_eq!(col.kind, ColumnKind::Text);
    }

    #[test]
    fn test_all_missing_column_is_numeric() {
        let col = Column::infer("a", vec![CellValue::Missing, CellValue::Missing]);
        assert!(col.is_numeric());
    }

    #[test]
    fn test_signed_zero_shares_key() {
        assert_eq!(CellValue::Number(0.0).key(), CellValue::Number(-0.0).key());
        assert_ne!(CellValue::Number(1.0).key(), CellValue::Missing.key());
    }

    #[test]
    fn test_number_display_is_shortest() {
        assert_eq!(CellValue::Number(1.0).to_string(), "1");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Missing.to_string(), "");
    }

    #[test]
    fn test_retain_rows_updates_count() {
        let mut ds = TabularDataset::from_columns(vec![Column::infer(
            "a",
            vec![
                CellValue::Number(1.0),
                CellValue::Number(2.0),
                CellValue::Number(3.0),
            ],
        )]);
        ds.retain_rows(&[true, false, true]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.columns()[0].cells[1], CellValue::Number(3.0));
    }
}
