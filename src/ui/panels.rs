use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::exporter::{ExportArtifact, ExportFormat};
use crate::data::pipeline::FileId;
use crate::state::{AppState, Banner, FileSession};
use crate::ui::{plot, table};

pub const SUCCESS_COLOR: Color32 = Color32::from_rgb(60, 170, 90);
pub const WARNING_COLOR: Color32 = Color32::from_rgb(220, 160, 40);
pub const ERROR_COLOR: Color32 = Color32::RED;

/// Deferred request from a widget, applied once the frame's borrows end.
enum FileAction {
    Focus(FileId),
    Remove(FileId),
    Apply(FileId),
    Convert(FileId),
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("{} file(s) loaded", state.files.len()));

        ui.separator();
        let has_files = !state.files.is_empty();
        if ui
            .add_enabled(has_files, egui::Button::new("Apply to all"))
            .clicked()
        {
            state.apply_all();
        }

        if let Some(status) = &state.status_message {
            banners(ui, std::slice::from_ref(status));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – per-file options
// ---------------------------------------------------------------------------

/// Render the list of uploaded files and the options of each one.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Sweeper");
    ui.label("Convert between CSV and Excel with built-in cleaning and charts.");
    ui.separator();

    if state.files.is_empty() {
        ui.label("No files uploaded.");
        if ui.button("Upload CSV / Excel files…").clicked() {
            open_files_dialog(state);
        }
        return;
    }

    let mut actions = Vec::new();
    let active = state.active;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for session in &mut state.files {
                let id = session.id();
                let title = RichText::new(session.upload.name()).strong();

                egui::CollapsingHeader::new(title)
                    .id_salt(id)
                    .default_open(active == Some(id))
                    .show(ui, |ui: &mut Ui| {
                        file_controls(ui, session, &mut actions);
                    });
            }
        });

    for action in actions {
        match action {
            FileAction::Focus(id) => state.active = Some(id),
            FileAction::Remove(id) => state.remove_file(id),
            FileAction::Apply(id) => {
                state.active = Some(id);
                state.apply(id);
            }
            FileAction::Convert(id) => {
                state.active = Some(id);
                if let Some(artifact) = state.convert(id) {
                    let start_dir = state.config.start_dir.clone();
                    match save_artifact_dialog(&artifact, start_dir.as_deref()) {
                        Ok(Some(path)) => {
                            state.status_message =
                                Some(Banner::Success(format!("Saved {}", path.display())));
                        }
                        Ok(None) => {}
                        Err(e) => {
                            log::error!("Failed to save export: {e:#}");
                            state.status_message = Some(Banner::Error(format!("Error: {e:#}")));
                        }
                    }
                }
            }
        }
    }
}

fn file_controls(ui: &mut Ui, session: &mut FileSession, actions: &mut Vec<FileAction>) {
    let id = session.id();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("Show").clicked() {
            actions.push(FileAction::Focus(id));
        }
        if ui.small_button("Remove").clicked() {
            actions.push(FileAction::Remove(id));
        }
    });

    let columns = match &session.loaded {
        Ok(ds) => ds.column_names(),
        Err(_) => {
            banners(ui, &session.banners);
            return;
        }
    };

    // ---- Cleaning ----
    ui.strong("Data Cleaning Options");
    ui.checkbox(&mut session.clean_enabled, "Clean data");
    ui.add_enabled_ui(session.clean_enabled, |ui: &mut Ui| {
        ui.checkbox(&mut session.cleaning.remove_duplicates, "Remove duplicates");
        ui.checkbox(
            &mut session.cleaning.fill_missing_with_mean,
            "Fill missing values with average",
        );
    });
    ui.separator();

    // ---- Column selection ----
    let n_selected = session.selected_columns.len();
    egui::CollapsingHeader::new(format!("Columns ({n_selected}/{})", columns.len()))
        .id_salt((id, "columns"))
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    session.select_all_columns();
                }
                if ui.small_button("None").clicked() {
                    session.select_no_columns();
                }
            });
            for col in &columns {
                let mut checked = session.selected_columns.contains(col);
                if ui.checkbox(&mut checked, col).changed() {
                    session.toggle_column(col);
                }
            }
        });
    ui.separator();

    // ---- Visualization ----
    ui.checkbox(&mut session.visualize, "Show visualization");

    // ---- Conversion ----
    ui.strong("File Conversion");
    ui.horizontal(|ui: &mut Ui| {
        for format in ExportFormat::ALL {
            ui.radio_value(&mut session.export_format, format, format.to_string());
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Apply").clicked() {
            actions.push(FileAction::Apply(id));
        }
        if ui.button("Convert and Download").clicked() {
            actions.push(FileAction::Convert(id));
        }
    });

    banners(ui, &session.banners);
}

fn banners(ui: &mut Ui, banners: &[Banner]) {
    for banner in banners {
        let (text, color) = match banner {
            Banner::Success(t) => (t, SUCCESS_COLOR),
            Banner::Warning(t) => (t, WARNING_COLOR),
            Banner::Error(t) => (t, ERROR_COLOR),
        };
        ui.label(RichText::new(text).color(color));
    }
}

// ---------------------------------------------------------------------------
// Central panel – file info, preview, chart
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(session) = state.active_session() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload CSV or Excel files to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(session.upload.name());
            ui.label(format!("File size: {:.2} KB", session.size_kb()));
            ui.separator();

            let Some(dataset) = session.preview_dataset() else {
                banners(ui, &session.banners);
                return;
            };

            ui.strong("Preview of the data");
            table::preview_table(ui, dataset, state.config.preview_rows);
            ui.separator();

            if let Some(summary) = session.chart() {
                ui.strong("Data Visualization");
                plot::bar_chart(ui, summary);
            }
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Upload your files (CSV or Excel)")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"]);
    if let Some(dir) = &state.config.start_dir {
        dialog = dialog.set_directory(dir);
    }

    let Some(paths) = dialog.pick_files() else {
        return;
    };

    for path in paths {
        if let Err(e) = state.open_path(&path) {
            log::error!("Failed to open file: {e:#}");
            state.status_message = Some(Banner::Error(format!("Error: {e:#}")));
        }
    }
}

/// Ask where to save `artifact` and write it there. `Ok(None)` if cancelled.
fn save_artifact_dialog(
    artifact: &ExportArtifact,
    start_dir: Option<&std::path::Path>,
) -> anyhow::Result<Option<std::path::PathBuf>> {
    let extension = artifact.suffix.trim_start_matches('.');
    let mut dialog = rfd::FileDialog::new()
        .set_title(format!("Save {}", artifact.file_name))
        .set_file_name(&artifact.file_name)
        .add_filter(artifact.content_type, &[extension]);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }

    let Some(path) = dialog.save_file() else {
        return Ok(None);
    };

    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved {} bytes to {}", artifact.bytes.len(), path.display());
    Ok(Some(path))
}
