use super::model::TabularDataset;

/// Rows shown in the bar chart unless configured otherwise.
pub const CHART_PREVIEW_ROWS: usize = 5;

/// One bar series: a numeric column over the preview rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// `None` where the cell is missing; no bar is drawn there.
    pub values: Vec<Option<f64>>,
}

/// Row-aligned series ready for a grouped bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Row index of each position on the x axis.
    pub rows: Vec<usize>,
    pub series: Vec<ChartSeries>,
}

/// Outcome of summarising a dataset for charting.
///
/// `NoNumericColumns` is a normal result, shown to the user as a warning.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSummary {
    Series(ChartData),
    NoNumericColumns,
}

pub fn summarize_for_chart(dataset: &TabularDataset) -> ChartSummary {
    summarize_for_chart_rows(dataset, CHART_PREVIEW_ROWS)
}

/// Take the first `max_rows` rows of every numeric column.
pub fn summarize_for_chart_rows(dataset: &TabularDataset, max_rows: usize) -> ChartSummary {
    let n = dataset.row_count().min(max_rows);

    let series: Vec<ChartSeries> = dataset
        .numeric_columns()
        .map(|col| ChartSeries {
            name: col.name.clone(),
            values: col.cells[..n].iter().map(|c| c.as_f64()).collect(),
        })
        .collect();

    if series.is_empty() {
        return ChartSummary::NoNumericColumns;
    }

    ChartSummary::Series(ChartData {
        rows: (0..n).collect(),
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    #[test]
    fn test_text_only_dataset_has_no_numeric_columns() {
        let ds = TabularDataset::from_columns(vec![Column::infer(
            "name",
            vec![CellValue::Text("a".into())],
        )]);
        assert_eq!(summarize_for_chart(&ds), ChartSummary::NoNumericColumns);
    }

    #[test]
    fn test_takes_first_five_numeric_rows() {
        let values: Vec<CellValue> = (0..8).map(|i| CellValue::Number(i as f64)).collect();
        let ds = TabularDataset::from_columns(vec![
            Column::infer("label", (0..8).map(|i| CellValue::Text(format!("r{i}"))).collect()),
            Column::infer("v", values),
        ]);

        let ChartSummary::Series(data) = summarize_for_chart(&ds) else {
            panic!("expected series");
        };
        assert_eq!(data.rows, vec![0, 1, 2, 3, 4]);
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].name, "v");
        assert_eq!(data.series[0].values[4], Some(4.0));
    }

    #[test]
    fn test_missing_cells_are_gaps() {
        let ds = TabularDataset::from_columns(vec![Column::infer(
            "v",
            vec![CellValue::Number(1.0), CellValue::Missing],
        )]);
        let ChartSummary::Series(data) = summarize_for_chart_rows(&ds, 10) else {
            panic!("expected series");
        };
        assert_eq!(data.series[0].values, vec![Some(1.0), None]);
    }
}
