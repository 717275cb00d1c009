// Refresh state and user notices
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RefreshState {
    pub last_update: Option<DateTime<Utc>>,
    pub active_file_name: Option<String>,
    pub is_loading: bool,
    pub auto_refresh_enabled: bool,
    pub has_shown_first_alert: bool,
}

impl RefreshState {
    pub fn new(auto_refresh_enabled: bool) -> Self {
        Self {
            last_update: None,
            active_file_name: None,
            is_loading: false,
            auto_refresh_enabled,
            has_shown_first_alert: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message surfaced to the user, the service-side equivalent of an alert dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }

    fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}
