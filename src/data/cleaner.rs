use std::collections::HashSet;

use super::model::{CellKey, CellValue, TabularDataset};

// ---------------------------------------------------------------------------
// Cleaning options
// ---------------------------------------------------------------------------

/// The two independent cleaning toggles of one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningOptions {
    pub remove_duplicates: bool,
    pub fill_missing_with_mean: bool,
}

impl CleaningOptions {
    pub fn is_noop(&self) -> bool {
        !self.remove_duplicates && !self.fill_missing_with_mean
    }
}

/// What a cleaning pass actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub duplicates_removed: usize,
    pub cells_filled: usize,
}

// ---------------------------------------------------------------------------
// Clean
// ---------------------------------------------------------------------------

/// Apply the selected operations in place. Duplicate removal always runs
/// before mean filling.
pub fn clean(dataset: &mut TabularDataset, options: &CleaningOptions) -> CleaningReport {
    let mut report = CleaningReport::default();

    if options.remove_duplicates {
        report.duplicates_removed = remove_duplicates(dataset);
        log::debug!("Removed {} duplicate rows", report.duplicates_removed);
    }
    if options.fill_missing_with_mean {
        report.cells_filled = fill_missing_with_mean(dataset);
        log::debug!("Filled {} missing numeric cells", report.cells_filled);
    }

    report
}

/// Collapse rows equal in every column onto their first occurrence.
/// Returns the number of rows dropped.
pub fn remove_duplicates(dataset: &mut TabularDataset) -> usize {
    let n_rows = dataset.row_count();
    if dataset.column_count() == 0 {
        // Every zero-width row equals every other one.
        let keep: Vec<bool> = (0..n_rows).map(|i| i == 0).collect();
        dataset.retain_rows(&keep);
        return n_rows - dataset.row_count();
    }

    let keep: Vec<bool> = {
        let columns = dataset.columns();
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(n_rows);
        (0..n_rows)
            .map(|row| {
                let key: Vec<CellKey<'_>> = columns.iter().map(|c| c.cells[row].key()).collect();
                seen.insert(key)
            })
            .collect()
    };

    dataset.retain_rows(&keep);
    n_rows - dataset.row_count()
}

/// Replace missing cells of every numeric column with that column's mean.
///
/// The mean is taken over the non-missing values before any replacement.
/// Columns with no values (or a NaN mean) keep their missing cells.
/// Returns the number of cells filled.
pub fn fill_missing_with_mean(dataset: &mut TabularDataset) -> usize {
    let mut filled = 0;

    for column in dataset.columns_mut().iter_mut().filter(|c| c.is_numeric()) {
        let values: Vec<f64> = column.cells.iter().filter_map(CellValue::as_f64).collect();
        if values.is_empty() {
            continue;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        if mean.is_nan() {
            log::debug!("Column '{}' has an undefined mean, left as is", column.name);
            continue;
        }

        for cell in column.cells.iter_mut().filter(|c| c.is_missing()) {
            *cell = CellValue::Number(mean);
            filled += 1;
        }
    }

    filled
}
