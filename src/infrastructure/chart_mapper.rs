// Mapper to convert a chart dataset into a render description for the client
use crate::domain::dataset::{ChartDataset, ChartKind};
use crate::infrastructure::config::LayoutSettings;
use serde::Serialize;

const LABEL_COLOR: &str = "rgba(45, 52, 54, 1)";
const BACKGROUND: &str = "#ffffff";
const STROKE_WIDTH: u32 = 2;
const DECIMAL_PLACES: u32 = 2;
const FILL_OPACITY: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub kind: ChartKind,
    pub width: u32,
    pub height: u32,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub style: ChartStyle,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartStyle {
    pub color: String,
    pub fill_color: String,
    pub label_color: String,
    pub background: String,
    pub stroke_width: u32,
    pub decimal_places: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub hue: f64,
    pub color: String,
}

pub fn chart_to_view(dataset: &ChartDataset, kind: ChartKind, layout: &LayoutSettings) -> ChartView {
    let color = dataset.color();
    let slices = match kind {
        ChartKind::Pie => pie_slices(dataset),
        ChartKind::Line | ChartKind::Bar => Vec::new(),
    };

    ChartView {
        kind,
        width: layout.chart_width(),
        height: layout.chart_height,
        labels: dataset.labels().to_vec(),
        values: dataset.values().to_vec(),
        style: ChartStyle {
            color: color.rgba(1.0),
            fill_color: color.rgba(FILL_OPACITY),
            label_color: LABEL_COLOR.to_string(),
            background: BACKGROUND.to_string(),
            stroke_width: STROKE_WIDTH,
            decimal_places: DECIMAL_PLACES,
        },
        slices,
    }
}

fn pie_slices(dataset: &ChartDataset) -> Vec<PieSlice> {
    dataset
        .points()
        .zip(dataset.pie_hues())
        .map(|((label, value), hue)| {
            PieSlice {
                name: label.to_string(),
                value,
                hue,
                color: format!("hsl({}, 70%, 50%)", hue),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::SeriesColor;

    fn dataset() -> ChartDataset {
        ChartDataset::new(
            [("Jan", 20.0), ("Feb", 45.0), ("Mar", 28.0)],
            SeriesColor::BLUE,
        )
    }

    #[test]
    fn test_line_view_uses_layout_and_series_color() {
        let view = chart_to_view(&dataset(), ChartKind::Line, &LayoutSettings::default());

        assert_eq!(view.width, 358);
        assert_eq!(view.height, 220);
        assert_eq!(view.style.color, "rgba(0, 123, 255, 1)");
        assert_eq!(view.style.fill_color, "rgba(0, 123, 255, 0.1)");
        assert_eq!(view.labels.len(), view.values.len());
        assert!(view.slices.is_empty());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("slices").is_none());
        assert_eq!(json["kind"], "line");
    }

    #[test]
    fn test_pie_view_assigns_one_hue_per_slice() {
        let view = chart_to_view(&dataset(), ChartKind::Pie, &LayoutSettings::default());
        let hues: Vec<f64> = view.slices.iter().map(|s| s.hue).collect();

        assert_eq!(hues, vec![0.0, 120.0, 240.0]);
        assert_eq!(view.slices[1].color, "hsl(120, 70%, 50%)");
        assert_eq!(view.slices[2].name, "Mar");
        assert_eq!(view.slices[2].value, 28.0);
    }
}
