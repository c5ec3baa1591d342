use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::SeriesColors;
use crate::data::chart::{ChartData, ChartSummary};
use crate::ui::panels::WARNING_COLOR;

/// Total width taken by one row's group of bars.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Bar chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart summary of the active file.
pub fn bar_chart(ui: &mut Ui, summary: &ChartSummary) {
    match summary {
        ChartSummary::NoNumericColumns => {
            ui.label(
                RichText::new("No numeric columns available for visualization.")
                    .color(WARNING_COLOR),
            );
        }
        ChartSummary::Series(data) => grouped_bars(ui, data),
    }
}

fn grouped_bars(ui: &mut Ui, data: &ChartData) {
    let colors = SeriesColors::for_chart(data);
    let n_series = data.series.len().max(1) as f64;
    let bar_width = GROUP_WIDTH / n_series;

    Plot::new("bar_chart")
        .legend(Legend::default())
        .x_axis_label("Row")
        .y_axis_label("Value")
        .height(280.0)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (s_idx, series) in data.series.iter().enumerate() {
                // Centre the group of bars on the row index.
                let offset = (s_idx as f64 + 0.5) * bar_width - GROUP_WIDTH / 2.0;

                let bars: Vec<Bar> = data
                    .rows
                    .iter()
                    .zip(&series.values)
                    .filter_map(|(&row, value)| {
                        value.map(|v| {
                            Bar::new(row as f64 + offset, v)
                                .width(bar_width)
                                .name(format!("{} (row {row})", series.name))
                        })
                    })
                    .collect();

                let chart = BarChart::new(bars)
                    .name(&series.name)
                    .color(colors.color_for(&series.name));

                plot_ui.bar_chart(chart);
            }
        });
}
