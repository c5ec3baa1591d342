use std::collections::HashSet;

use super::error::{Result, SweepError};
use super::model::TabularDataset;

/// Restrict `dataset` to the chosen columns.
///
/// The result keeps the dataset's own column order, whatever order the
/// names arrive in. Every name is checked before anything is removed, so a
/// stale selection leaves the dataset untouched.
pub fn select<S: AsRef<str>>(dataset: &mut TabularDataset, chosen: &[S]) -> Result<()> {
    let known: HashSet<&str> = dataset.columns().iter().map(|c| c.name.as_str()).collect();
    if let Some(unknown) = chosen.iter().map(AsRef::as_ref).find(|name| !known.contains(name)) {
        return Err(SweepError::UnknownColumn(unknown.to_string()));
    }
    let chosen: HashSet<&str> = chosen.iter().map(AsRef::as_ref).collect();

    let keep: Vec<bool> = dataset
        .columns()
        .iter()
        .map(|c| chosen.contains(c.name.as_str()))
        .collect();
    dataset.retain_columns(&keep);

    log::debug!("Selected columns {:?}", dataset.column_names());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn abc() -> TabularDataset {
        let col = |name: &str| {
            Column::infer(name, vec![CellValue::Number(1.0), CellValue::Number(2.0)])
        };
        TabularDataset::from_columns(vec![col("A"), col("B"), col("C")])
    }

    #[test]
    fn test_select_preserves_original_order() {
        let mut ds = abc();
        select(&mut ds, &["C", "A"]).unwrap();
        assert_eq!(ds.column_names(), vec!["A", "C"]);
    }

    #[test]
    fn test_select_nothing_keeps_rows() {
        let mut ds = abc();
        select::<&str>(&mut ds, &[]).unwrap();
        assert_eq!(ds.column_count(), 0);
        assert_eq!(ds.row_count(), 2);
    }

    #[test]
    fn test_unknown_column() {
        let mut ds = abc();
        let err = select(&mut ds, &["A", "Z"]).unwrap_err();
        assert_eq!(err, SweepError::UnknownColumn("Z".into()));
        assert_eq!(ds, abc());
    }

    #[test]
    fn test_stale_selection_after_narrowing() {
        let mut ds = abc();
        select(&mut ds, &["A"]).unwrap();
        assert!(matches!(
            select(&mut ds, &["B"]),
            Err(SweepError::UnknownColumn(name)) if name == "B"
        ));
    }
}
