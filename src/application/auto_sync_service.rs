// Auto-sync service - Timer driven refresh of the watched folder
use crate::application::chart_board::ChartBoard;
use crate::application::sync_source::SyncSource;
use crate::domain::refresh::Notice;
use crate::domain::sample::{SampleFile, fallback_sample};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefreshError {
    #[error("a refresh is already in progress")]
    Busy,

    #[error("refresh task failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshOutcome {
    Success,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub outcome: RefreshOutcome,
    pub file_name: String,
    pub at: DateTime<Utc>,
}

/// Owned handle to the periodic scheduler. Dropping it stops scheduling.
///
/// Stopping never cancels a refresh that is already running; refreshes run
/// as their own tasks.
pub struct SchedulerHandle {
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Clone)]
pub struct AutoSyncService {
    source: Arc<dyn SyncSource>,
    board: Arc<ChartBoard>,
    interval: Duration,
}

impl AutoSyncService {
    pub fn new(source: Arc<dyn SyncSource>, board: Arc<ChartBoard>, interval: Duration) -> Self {
        Self {
            source,
            board,
            interval,
        }
    }

    pub fn board(&self) -> &Arc<ChartBoard> {
        &self.board
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn file_count(&self) -> usize {
        self.source.file_count()
    }

    /// Load once right away, then keep refreshing on the interval while
    /// auto-refresh is enabled.
    pub async fn start(&self) -> SchedulerHandle {
        tracing::info!(
            "Starting auto-sync, refreshing every {}s",
            self.interval.as_secs()
        );
        self.spawn_refresh().await;

        let service = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(Instant::now() + service.interval, service.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if !service.board.auto_refresh_enabled().await {
                    tracing::debug!("Auto-refresh disabled, skipping tick");
                    continue;
                }

                if service.spawn_refresh().await.is_none() {
                    tracing::debug!("Previous refresh still running, skipping tick");
                }
            }
        });

        SchedulerHandle { task }
    }

    /// Manually triggered refresh. Waits for the result.
    pub async fn refresh_now(&self) -> Result<RefreshReport, RefreshError> {
        let handle = self.spawn_refresh().await.ok_or(RefreshError::Busy)?;
        handle
            .await
            .map_err(|e| RefreshError::Failed(e.to_string()))?
    }

    /// Enable or pause scheduled refreshes. Never starts or cancels a refresh itself.
    pub async fn set_auto_refresh(&self, enabled: bool) {
        self.board.set_auto_refresh(enabled).await;

        let notice = if enabled {
            Notice::info(
                "Auto-refresh Enabled",
                format!(
                    "Data will be automatically updated every {} seconds from the FTP folder.",
                    self.interval.as_secs()
                ),
            )
        } else {
            Notice::info(
                "Auto-refresh Disabled",
                "Automatic data updates have been paused.",
            )
        };
        self.board.notify(notice).await;
    }

    /// Start a refresh as its own task, unless one is already running.
    ///
    /// The refresh is supervised by an outer task so the board leaves the
    /// loading state even if the source panics.
    async fn spawn_refresh(&self) -> Option<JoinHandle<Result<RefreshReport, RefreshError>>> {
        if !self.board.try_begin_loading().await {
            return None;
        }

        let service = self.clone();
        let refresh = tokio::spawn(async move { service.run_refresh().await });

        let board = self.board.clone();
        Some(tokio::spawn(async move {
            match refresh.await {
                Ok(report) => Ok(report),
                Err(e) => {
                    tracing::error!("Refresh task failed: {}", e);
                    board.finish_loading().await;
                    Err(RefreshError::Failed(e.to_string()))
                }
            }
        }))
    }

    async fn run_refresh(&self) -> RefreshReport {
        tracing::debug!("Reading latest file from sync source");

        let (sample, outcome) = match self.source.fetch_latest().await {
            Ok(sample) => (sample, RefreshOutcome::Success),
            Err(e) => {
                tracing::warn!("Sync source failed, loading fallback data: {:#}", e);
                (fallback_sample(), RefreshOutcome::Fallback)
            }
        };

        let SampleFile { file_name, dataset } = sample;
        let at = self.board.publish(&file_name, dataset).await;

        if self.board.take_first_alert().await {
            self.board
                .notify(self.first_load_notice(outcome, &file_name))
                .await;
        }

        RefreshReport {
            outcome,
            file_name,
            at,
        }
    }

    fn first_load_notice(&self, outcome: RefreshOutcome, file_name: &str) -> Notice {
        match outcome {
            RefreshOutcome::Success => Notice::info(
                "Data Loaded Successfully",
                format!(
                    "Automatically loaded data from FTP folder: {}\n\nAuto-refresh is enabled every {} seconds.",
                    file_name,
                    self.interval.as_secs()
                ),
            ),
            RefreshOutcome::Fallback => Notice::warning(
                "FTP Connection Failed",
                "Could not connect to FTP server. Loaded demo data instead.",
            ),
        }
    }
}
