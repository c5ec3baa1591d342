/// Data layer: core types and the sweep pipeline.
///
/// Architecture:
/// ```text
///   .csv / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → TabularDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cleaner  │  drop duplicate rows, fill numeric gaps with the mean
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ selector  │  keep chosen columns (original order)
///   └──────────┘
///        │
///        ├──────────────► chart     first rows of numeric columns
///        ▼
///   ┌──────────┐
///   │ exporter  │  TabularDataset → .csv / .xlsx bytes
///   └──────────┘
/// ```
///
/// `pipeline` ties the stages together behind one explicit request per file.

pub mod chart;
pub mod cleaner;
pub mod error;
pub mod exporter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod selector;
