// Settings service - In-memory connection form, no network I/O
use crate::domain::connection::ConnectionConfig;
use crate::domain::refresh::Notice;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Please fill in the required fields (Host and Username)")]
    MissingFields(Vec<&'static str>),
}

/// Outcome of the simulated connection test.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReport {
    pub simulated: bool,
    pub host_reachable: bool,
    pub authenticated: bool,
    pub folder_accessible: bool,
    pub files_found: usize,
    pub folder_path: String,
    pub interval_secs: u64,
}

#[derive(Clone)]
pub struct SettingsService {
    config: Arc<RwLock<ConnectionConfig>>,
    files_found: usize,
    interval_secs: u64,
}

impl SettingsService {
    pub fn new(initial: ConnectionConfig, files_found: usize, interval_secs: u64) -> Self {
        Self {
            config: Arc::new(RwLock::new(initial)),
            files_found,
            interval_secs,
        }
    }

    pub async fn get(&self) -> ConnectionConfig {
        self.config.read().await.clone()
    }

    /// Store a submitted form. A form without a password keeps the stored one;
    /// an empty password clears it.
    pub async fn submit(&self, mut form: ConnectionConfig) -> Result<Notice, SettingsError> {
        let missing = form.missing_required_fields();
        if !missing.is_empty() {
            tracing::debug!("Rejected settings, missing {:?}", missing);
            return Err(SettingsError::MissingFields(missing));
        }

        tracing::info!(
            "Connection settings updated for {}@{}:{}",
            form.username,
            form.host,
            form.port
        );
        let mut config = self.config.write().await;
        if form.password.is_none() {
            form.password = config.password.take();
        }
        *config = form;

        Ok(Notice::info(
            "FTP Auto-Reader Configuration",
            "Your settings have been saved. The app will automatically read XLS files from the specified FTP folder.\n\nReal FTP connectivity is not available yet; simulated data is used.",
        ))
    }

    /// Always succeeds: there is no transport behind this yet.
    pub async fn test_connection(&self) -> ConnectionReport {
        let config = self.config.read().await;
        ConnectionReport {
            simulated: true,
            host_reachable: true,
            authenticated: true,
            folder_accessible: true,
            files_found: self.files_found,
            folder_path: config.folder_path.clone(),
            interval_secs: self.interval_secs,
        }
    }
}
