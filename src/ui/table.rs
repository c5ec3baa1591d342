use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CellValue, TabularDataset};

const ROW_HEIGHT: f32 = 18.0;

/// Show the first `max_rows` rows of `dataset` in a striped table.
pub fn preview_table(ui: &mut Ui, dataset: &TabularDataset, max_rows: usize) {
    if dataset.column_count() == 0 {
        ui.label(format!("No columns selected ({} rows).", dataset.row_count()));
        return;
    }

    let n_rows = dataset.row_count().min(max_rows);
    let columns = dataset.columns();

    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .column(Column::auto().at_least(36.0))
            .columns(Column::auto().at_least(60.0).clip(true), columns.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.weak("#");
                });
                for column in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&column.name)
                            .on_hover_text(column.kind.to_string());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, n_rows, |mut row| {
                    let idx = row.index();
                    row.col(|ui: &mut Ui| {
                        ui.weak(idx.to_string());
                    });
                    for column in columns {
                        row.col(|ui: &mut Ui| {
                            cell_label(ui, &column.cells[idx]);
                        });
                    }
                });
            });
    });

    if dataset.row_count() > n_rows {
        ui.weak(format!("… {} more rows", dataset.row_count() - n_rows));
    }
}

fn cell_label(ui: &mut Ui, cell: &CellValue) {
    match cell {
        CellValue::Missing => {
            ui.label(RichText::new("<missing>").italics().color(Color32::GRAY));
        }
        other => {
            ui.label(other.to_string());
        }
    }
}
