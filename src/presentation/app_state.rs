// Application state for HTTP handlers
use crate::application::auto_sync_service::AutoSyncService;
use crate::application::import_service::ImportService;
use crate::application::settings_service::SettingsService;
use crate::infrastructure::config::LayoutSettings;
use crate::infrastructure::file_pickers::DirectoryPicker;

#[derive(Clone)]
pub struct AppState {
    pub auto_sync: AutoSyncService,
    pub import: ImportService,
    pub settings: SettingsService,
    pub import_folder: DirectoryPicker,
    pub layout: LayoutSettings,
}
