use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::chart::ChartData;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// One colour per chart series, in series order.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    colors: Vec<(String, Color32)>,
}

impl SeriesColors {
    pub fn for_chart(data: &ChartData) -> Self {
        let palette = generate_palette(data.series.len());
        let colors = data
            .series
            .iter()
            .zip(palette)
            .map(|(s, c)| (s.name.clone(), c))
            .collect();
        SeriesColors { colors }
    }

    pub fn color_for(&self, series: &str) -> Color32 {
        self.colors
            .iter()
            .find(|(name, _)| name == series)
            .map(|(_, c)| *c)
            .unwrap_or(Color32::GRAY)
    }
}
