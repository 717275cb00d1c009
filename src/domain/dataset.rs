// Chart dataset domain models
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mobile display constraint: never show more points than this.
pub const MAX_DISPLAY_POINTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SeriesColor {
    pub const BLUE: SeriesColor = SeriesColor::new(0, 123, 255);
    pub const GREEN: SeriesColor = SeriesColor::new(40, 167, 69);
    pub const AMBER: SeriesColor = SeriesColor::new(255, 193, 7);
    pub const RED: SeriesColor = SeriesColor::new(220, 53, 69);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn rgba(&self, opacity: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, opacity)
    }
}

/// Label/value series shown by a chart. All points share one colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    labels: Vec<String>,
    values: Vec<f64>,
    color: SeriesColor,
}

impl ChartDataset {
    /// Builds a dataset, keeping at most [`MAX_DISPLAY_POINTS`] points.
    pub fn new<I, L>(points: I, color: SeriesColor) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
        L: Into<String>,
    {
        let (labels, values) = points
            .into_iter()
            .take(MAX_DISPLAY_POINTS)
            .map(|(label, value)| (label.into(), value))
            .unzip();

        Self {
            labels,
            values,
            color,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn color(&self) -> SeriesColor {
        self.color
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// One hue per point, spread evenly around the colour wheel.
    pub fn pie_hues(&self) -> Vec<f64> {
        let count = self.len();
        (0..count).map(|index| pie_hue(index, count)).collect()
    }
}

pub fn pie_hue(index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (360.0 * index as f64 / count as f64) % 360.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Pie,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
        };
        f.write_str(name)
    }
}
