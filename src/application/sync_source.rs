// Source traits for the auto-sync flow
use crate::domain::sample::SampleFile;
use async_trait::async_trait;

/// Where the auto-sync driver gets its data from.
#[async_trait]
pub trait SyncSource: Send + Sync {
    /// Fetch the file that should be shown next.
    async fn fetch_latest(&self) -> anyhow::Result<SampleFile>;

    /// Number of files the source currently knows about
    fn file_count(&self) -> usize;
}

/// Decides which of `count` candidate files counts as "changed".
pub trait SampleSelector: Send + Sync {
    fn select(&self, count: usize) -> usize;
}
