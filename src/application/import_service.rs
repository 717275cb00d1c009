// Import service - User triggered pick, decode, build and publish
use crate::application::chart_board::ChartBoard;
use crate::application::dataset_builder::{BuildError, build_dataset};
use crate::domain::dataset::SeriesColor;
use crate::domain::refresh::Notice;
use crate::infrastructure::tabular_decoder::{self, DecodeError};
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsb", "ods", "csv", "tsv"];

pub const SPREADSHEET_MIME_TYPES: &[&str] = &[
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel.sheet.binary.macroenabled.12",
    "application/vnd.oasis.opendocument.spreadsheet",
    "text/csv",
    "text/tab-separated-values",
];

/// Accepted file types for a pick.
#[derive(Debug, Clone, Copy)]
pub struct FileFilter {
    pub mime_types: &'static [&'static str],
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    pub const SPREADSHEETS: FileFilter = FileFilter {
        mime_types: SPREADSHEET_MIME_TYPES,
        extensions: SPREADSHEET_EXTENSIONS,
    };

    /// A declared MIME type wins; without one the extension decides.
    pub fn accepts(&self, file_name: &str, mime_type: Option<&str>) -> bool {
        match mime_type.map(str::trim).filter(|m| !m.is_empty()) {
            Some(mime) => self
                .mime_types
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(mime)),
            None => self.accepts_extension(file_name),
        }
    }

    pub fn accepts_extension(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub enum FileContent {
    Bytes(Vec<u8>),
    Base64(String),
}

/// A file the user selected: its name plus a way to get at the content.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub content: FileContent,
}

impl PickedFile {
    pub fn read_bytes(self) -> Result<Vec<u8>, DecodeError> {
        match self.content {
            FileContent::Bytes(bytes) => Ok(bytes),
            FileContent::Base64(text) => tabular_decoder::base64_bytes(&text),
        }
    }
}

#[async_trait]
pub trait FilePicker: Send + Sync {
    /// `Ok(None)` means the user cancelled.
    async fn pick(&self, filter: &FileFilter) -> Result<Option<PickedFile>, ImportError>;
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("an import is already in progress")]
    Busy,

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("{name} is not in the import folder")]
    NotFound { name: String },

    #[error("could not read {name}: {reason}")]
    Read { name: String, reason: String },

    #[error("could not decode file: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ImportOutcome {
    Cancelled,
    Imported { file_name: String, points: usize },
}

#[derive(Clone)]
pub struct ImportService {
    board: Arc<ChartBoard>,
    color: SeriesColor,
}

impl ImportService {
    pub fn new(board: Arc<ChartBoard>, color: SeriesColor) -> Self {
        Self { board, color }
    }

    pub fn board(&self) -> &Arc<ChartBoard> {
        &self.board
    }

    /// Run one import. On any failure the previously shown dataset is kept.
    pub async fn import(&self, picker: &dyn FilePicker) -> Result<ImportOutcome, ImportError> {
        if !self.board.try_begin_loading().await {
            return Err(ImportError::Busy);
        }

        let result = self.run_import(picker).await;
        self.board.finish_loading().await;

        match &result {
            Ok(ImportOutcome::Imported { file_name, points }) => {
                self.board
                    .notify(Notice::info(
                        "File Imported",
                        format!("Loaded {} data points from {}", points, file_name),
                    ))
                    .await;
            }
            Ok(ImportOutcome::Cancelled) => {
                tracing::debug!("File pick cancelled");
            }
            Err(e) => {
                tracing::warn!("Import failed: {}", e);
                self.board
                    .notify(Notice::error("Import Failed", e.to_string()))
                    .await;
            }
        }

        result
    }

    async fn run_import(&self, picker: &dyn FilePicker) -> Result<ImportOutcome, ImportError> {
        let filter = FileFilter::SPREADSHEETS;
        let Some(file) = picker.pick(&filter).await? else {
            return Ok(ImportOutcome::Cancelled);
        };

        if !filter.accepts(&file.name, file.mime_type.as_deref()) {
            let described = file.mime_type.clone().unwrap_or_else(|| file.name.clone());
            return Err(ImportError::UnsupportedType(described));
        }

        let file_name = file.name.clone();
        let bytes = file.read_bytes()?;
        tracing::debug!("Decoding {} ({} bytes)", file_name, bytes.len());

        let rows = tabular_decoder::decode(&bytes)?;
        let dataset = build_dataset(&rows, self.color)?;
        let points = dataset.len();

        self.board.publish(&file_name, dataset).await;
        Ok(ImportOutcome::Imported { file_name, points })
    }
}
