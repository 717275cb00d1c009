// File picker implementations for the import flow
use crate::application::import_service::{
    FileContent, FileFilter, FilePicker, ImportError, PickedFile,
};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// A file the client already picked on its side and uploaded.
/// An upload without a file is a cancelled pick.
pub struct UploadPicker {
    file: Option<PickedFile>,
}

impl UploadPicker {
    pub fn new(file: Option<PickedFile>) -> Self {
        Self { file }
    }

    pub fn base64(name: String, mime_type: Option<String>, content: String) -> Self {
        Self::new(Some(PickedFile {
            name,
            mime_type,
            content: FileContent::Base64(content),
        }))
    }
}

#[async_trait]
impl FilePicker for UploadPicker {
    async fn pick(&self, _filter: &FileFilter) -> Result<Option<PickedFile>, ImportError> {
        Ok(self.file.clone())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderEntry {
    pub name: String,
    pub size: u64,
}

/// Picks a named file out of the local import folder.
#[derive(Debug, Clone)]
pub struct DirectoryPicker {
    directory: PathBuf,
    selection: Option<String>,
}

impl DirectoryPicker {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            selection: None,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Same folder, with `file_name` selected. An empty name cancels the pick.
    pub fn select(&self, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            directory: self.directory.clone(),
            selection: if file_name.trim().is_empty() {
                None
            } else {
                Some(file_name)
            },
        }
    }

    /// Spreadsheet files currently in the folder, sorted by name.
    pub async fn list(&self, filter: &FileFilter) -> Result<Vec<FolderEntry>, ImportError> {
        let mut entries = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.directory).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(self.read_error(&self.directory.display().to_string(), e)),
        };

        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| self.read_error(&self.directory.display().to_string(), e))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if metadata.is_file() && filter.accepts_extension(&name) {
                entries.push(FolderEntry {
                    name,
                    size: metadata.len(),
                });
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn resolve(&self, file_name: &str) -> Result<PathBuf, ImportError> {
        let relative = Path::new(file_name);
        let is_plain_name = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        // Anything but a plain name could point outside the folder
        if !is_plain_name {
            return Err(ImportError::NotFound {
                name: file_name.to_string(),
            });
        }
        Ok(self.directory.join(relative))
    }

    fn read_error(&self, name: &str, e: std::io::Error) -> ImportError {
        match e.kind() {
            std::io::ErrorKind::NotFound => ImportError::NotFound {
                name: name.to_string(),
            },
            _ => ImportError::Read {
                name: name.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl FilePicker for DirectoryPicker {
    async fn pick(&self, filter: &FileFilter) -> Result<Option<PickedFile>, ImportError> {
        let Some(file_name) = self.selection.as_deref() else {
            return Ok(None);
        };

        if !filter.accepts_extension(file_name) {
            return Err(ImportError::UnsupportedType(file_name.to_string()));
        }

        let path = self.resolve(file_name)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| self.read_error(file_name, e))?;

        tracing::debug!("Picked {} from {}", file_name, self.directory.display());
        Ok(Some(PickedFile {
            name: file_name.to_string(),
            mime_type: None,
            content: FileContent::Bytes(bytes),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_picker_reads_selected_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("q1.csv"), "Month,Sales\nJan,1\n").unwrap();

        let picker = DirectoryPicker::new(dir.path()).select("q1.csv");
        let file = picker
            .pick(&FileFilter::SPREADSHEETS)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(file.name, "q1.csv");
        assert_eq!(file.read_bytes().unwrap(), b"Month,Sales\nJan,1\n".to_vec());
    }

    #[tokio::test]
    async fn test_directory_picker_rejects_traversal_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let picker = DirectoryPicker::new(dir.path());

        let err = picker
            .select("../secret.csv")
            .pick(&FileFilter::SPREADSHEETS)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::NotFound { .. }));

        let err = picker
            .select("missing.xlsx")
            .pick(&FileFilter::SPREADSHEETS)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::NotFound { name } if name == "missing.xlsx"));

        let err = picker
            .select("notes.txt")
            .pick(&FileFilter::SPREADSHEETS)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedType(_)));
    }

    #[tokio::test]
    async fn test_io_failures_other_than_missing_are_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.csv")).unwrap();
        std::fs::write(dir.path().join("plain.csv"), "a,b\n").unwrap();

        let err = DirectoryPicker::new(dir.path())
            .select("folder.csv")
            .pick(&FileFilter::SPREADSHEETS)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Read { name, .. } if name == "folder.csv"));

        // A file where the folder should be cannot be listed
        let err = DirectoryPicker::new(dir.path().join("plain.csv"))
            .list(&FileFilter::SPREADSHEETS)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
    }

    #[tokio::test]
    async fn test_empty_selection_is_a_cancel() {
        let picker = DirectoryPicker::new("imports").select("  ");
        assert!(picker.pick(&FileFilter::SPREADSHEETS).await.unwrap().is_none());
        assert!(
            UploadPicker::new(None)
                .pick(&FileFilter::SPREADSHEETS)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_only_returns_spreadsheets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.xlsx"), b"x").unwrap();
        std::fs::write(dir.path().join("a.csv"), b"xy").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"z").unwrap();
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let entries = DirectoryPicker::new(dir.path())
            .list(&FileFilter::SPREADSHEETS)
            .await
            .unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.csv", "b.xlsx"]);
        assert_eq!(entries[0].size, 2);

        let missing = DirectoryPicker::new(dir.path().join("nope"))
            .list(&FileFilter::SPREADSHEETS)
            .await
            .unwrap();
        assert!(missing.is_empty());
    }
}
