// Sample file domain model
use super::dataset::{ChartDataset, SeriesColor};

pub const FALLBACK_FILE_NAME: &str = "demo-fallback-data.xls";

/// A file fetched from the watched folder, already reduced to a chart dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFile {
    pub file_name: String,
    pub dataset: ChartDataset,
}

impl SampleFile {
    pub fn new(file_name: impl Into<String>, dataset: ChartDataset) -> Self {
        Self {
            file_name: file_name.into(),
            dataset,
        }
    }
}

/// Dataset shown when the folder cannot be read.
pub fn fallback_sample() -> SampleFile {
    let labels = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
    let values = [20.0, 45.0, 28.0, 80.0, 99.0, 43.0];
    SampleFile::new(
        FALLBACK_FILE_NAME,
        ChartDataset::new(labels.into_iter().zip(values), SeriesColor::RED),
    )
}
