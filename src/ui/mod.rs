/// Rendering only: every widget reads or mutates `AppState`, and all
/// data work is delegated to `crate::data`.

pub mod panels;
pub mod plot;
pub mod table;
