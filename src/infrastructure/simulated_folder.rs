// Simulated remote folder - stands in for the file server until a real transport exists
use crate::application::sync_source::{SampleSelector, SyncSource};
use crate::domain::dataset::{ChartDataset, SeriesColor};
use crate::domain::sample::SampleFile;
use crate::infrastructure::config::{SelectionPolicy, SyncSettings};
use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Picks uniformly at random.
#[derive(Debug, Default)]
pub struct RandomSelector;

impl SampleSelector for RandomSelector {
    fn select(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..count)
    }
}

/// Walks the files in order, wrapping around.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    next: AtomicUsize,
}

impl SampleSelector for RoundRobinSelector {
    fn select(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.next.fetch_add(1, Ordering::Relaxed) % count
    }
}

pub fn selector_for(policy: SelectionPolicy) -> Arc<dyn SampleSelector> {
    match policy {
        SelectionPolicy::Random => Arc::new(RandomSelector),
        SelectionPolicy::RoundRobin => Arc::new(RoundRobinSelector::default()),
    }
}

/// The canned files the simulated folder serves.
pub fn canned_samples() -> Vec<SampleFile> {
    vec![
        SampleFile::new(
            "sales-data-q1.xls",
            ChartDataset::new(
                ["Jan", "Feb", "Mar", "Apr", "May", "Jun"]
                    .into_iter()
                    .zip([20.0, 45.0, 28.0, 80.0, 99.0, 43.0]),
                SeriesColor::BLUE,
            ),
        ),
        SampleFile::new(
            "revenue-report.xls",
            ChartDataset::new(
                ["Product A", "Product B", "Product C", "Product D", "Product E"]
                    .into_iter()
                    .zip([150.0, 230.0, 180.0, 320.0, 280.0]),
                SeriesColor::GREEN,
            ),
        ),
        SampleFile::new(
            "monthly-metrics.xls",
            ChartDataset::new(
                ["Week 1", "Week 2", "Week 3", "Week 4"]
                    .into_iter()
                    .zip([65.0, 78.0, 90.0, 85.0]),
                SeriesColor::AMBER,
            ),
        ),
    ]
}

pub struct SimulatedFolderSource {
    samples: Vec<SampleFile>,
    selector: Arc<dyn SampleSelector>,
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedFolderSource {
    pub fn new(
        samples: Vec<SampleFile>,
        selector: Arc<dyn SampleSelector>,
        latency: Duration,
        failure_rate: f64,
    ) -> Self {
        let failure_rate = if failure_rate.is_finite() {
            failure_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            samples,
            selector,
            latency,
            failure_rate,
        }
    }

    pub fn from_settings(settings: &SyncSettings) -> Self {
        Self::new(
            canned_samples(),
            selector_for(settings.selection),
            settings.latency(),
            settings.failure_rate,
        )
    }

    fn should_fail(&self) -> bool {
        self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate)
    }
}

#[async_trait]
impl SyncSource for SimulatedFolderSource {
    async fn fetch_latest(&self) -> Result<SampleFile> {
        tokio::time::sleep(self.latency).await;

        if self.should_fail() {
            anyhow::bail!("simulated connection failure");
        }
        if self.samples.is_empty() {
            anyhow::bail!("folder contains no spreadsheet files");
        }

        let index = self.selector.select(self.samples.len()).min(self.samples.len() - 1);
        let sample = self.samples[index].clone();
        tracing::debug!("Simulated folder selected {}", sample.file_name);
        Ok(sample)
    }

    fn file_count(&self) -> usize {
        self.samples.len()
    }
}
