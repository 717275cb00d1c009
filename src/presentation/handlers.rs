// HTTP request handlers
use crate::application::auto_sync_service::RefreshError;
use crate::application::chart_board::{BoardSnapshot, ChartBoard};
use crate::application::import_service::{FileFilter, ImportError, ImportOutcome};
use crate::application::settings_service::{SettingsError, SettingsService};
use crate::domain::connection::ConnectionConfig;
use crate::domain::dataset::ChartKind;
use crate::domain::refresh::Notice;
use crate::infrastructure::chart_mapper::{ChartView, chart_to_view};
use crate::infrastructure::chunked_events::stream_from_receiver;
use crate::infrastructure::config::LayoutSettings;
use crate::infrastructure::file_pickers::UploadPicker;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: BoardSnapshot,
    pub chart: Option<ChartView>,
}

#[derive(Deserialize)]
pub struct KindRequest {
    pub kind: ChartKind,
}

#[derive(Deserialize)]
pub struct AutoRefreshRequest {
    pub enabled: bool,
}

#[derive(Deserialize)]
pub struct UploadRequest {
    pub file: Option<UploadedFile>,
}

#[derive(Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub content_base64: String,
}

#[derive(Deserialize)]
pub struct PickRequest {
    #[serde(default)]
    pub file_name: String,
}

#[derive(Serialize)]
struct ImportResponse {
    outcome: ImportOutcome,
    board: BoardView,
}

#[derive(Serialize)]
struct SettingsView {
    #[serde(flatten)]
    config: ConnectionConfig,
    has_password: bool,
}

#[derive(Serialize)]
struct SettingsSaved {
    notice: Notice,
    settings: SettingsView,
}

/// Error body returned for every failed request
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<RefreshError> for ApiError {
    fn from(e: RefreshError) -> Self {
        let status = match e {
            RefreshError::Busy => StatusCode::CONFLICT,
            RefreshError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(e: ImportError) -> Self {
        let status = match e {
            ImportError::Busy => StatusCode::CONFLICT,
            ImportError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ImportError::NotFound { .. } => StatusCode::NOT_FOUND,
            ImportError::Read { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ImportError::Decode(_) | ImportError::Build(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, e.to_string())
    }
}

impl From<SettingsError> for ApiError {
    fn from(e: SettingsError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, e.to_string())
    }
}

async fn respond<T: Serialize>(headers: &HeaderMap, status: StatusCode, data: &T) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn board_view(board: &ChartBoard, layout: &LayoutSettings) -> BoardView {
    let snapshot = board.snapshot().await;
    let chart = snapshot
        .dataset
        .as_ref()
        .map(|dataset| chart_to_view(dataset, snapshot.kind, layout));
    BoardView {
        board: snapshot,
        chart,
    }
}

async fn settings_view(settings: &SettingsService) -> SettingsView {
    let config = settings.get().await;
    let has_password = config.has_password();
    SettingsView {
        config,
        has_password,
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

// Auto-sync screen

pub async fn sync_board(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = board_view(state.auto_sync.board(), &state.layout).await;
    respond(&headers, StatusCode::OK, &view).await
}

pub async fn refresh_sync(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let report = state.auto_sync.refresh_now().await?;
    Ok(respond(&headers, StatusCode::OK, &report).await)
}

pub async fn set_auto_refresh(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AutoRefreshRequest>,
) -> Response {
    state.auto_sync.set_auto_refresh(request.enabled).await;
    let view = board_view(state.auto_sync.board(), &state.layout).await;
    respond(&headers, StatusCode::OK, &view).await
}

pub async fn set_sync_kind(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<KindRequest>,
) -> Response {
    state.auto_sync.board().set_kind(request.kind).await;
    let view = board_view(state.auto_sync.board(), &state.layout).await;
    respond(&headers, StatusCode::OK, &view).await
}

pub async fn clear_sync(State(state): State<Arc<AppState>>) -> StatusCode {
    state.auto_sync.board().clear().await;
    StatusCode::NO_CONTENT
}

pub async fn sync_events(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let rx = state.auto_sync.board().subscribe();
    stream_from_receiver(rx, accepts_brotli(&headers)).into_response()
}

// Import screen

pub async fn import_board(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = board_view(state.import.board(), &state.layout).await;
    respond(&headers, StatusCode::OK, &view).await
}

pub async fn upload_file(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UploadRequest>,
) -> Result<Response, ApiError> {
    let picker = match request.file {
        Some(file) => UploadPicker::base64(file.name, file.mime_type, file.content_base64),
        None => UploadPicker::new(None),
    };

    let outcome = state.import.import(&picker).await?;
    let board = board_view(state.import.board(), &state.layout).await;
    Ok(respond(&headers, StatusCode::OK, &ImportResponse { outcome, board }).await)
}

pub async fn pick_file(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<PickRequest>,
) -> Result<Response, ApiError> {
    let picker = state.import_folder.select(request.file_name);
    let outcome = state.import.import(&picker).await?;
    let board = board_view(state.import.board(), &state.layout).await;
    Ok(respond(&headers, StatusCode::OK, &ImportResponse { outcome, board }).await)
}

pub async fn list_import_files(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let files = state.import_folder.list(&FileFilter::SPREADSHEETS).await?;
    Ok(respond(&headers, StatusCode::OK, &files).await)
}

pub async fn set_import_kind(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<KindRequest>,
) -> Response {
    state.import.board().set_kind(request.kind).await;
    let view = board_view(state.import.board(), &state.layout).await;
    respond(&headers, StatusCode::OK, &view).await
}

pub async fn clear_import(State(state): State<Arc<AppState>>) -> StatusCode {
    state.import.board().clear().await;
    StatusCode::NO_CONTENT
}

pub async fn import_events(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let rx = state.import.board().subscribe();
    stream_from_receiver(rx, accepts_brotli(&headers)).into_response()
}

// Settings screen

pub async fn get_settings(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = settings_view(&state.settings).await;
    respond(&headers, StatusCode::OK, &view).await
}

pub async fn submit_settings(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(form): Json<ConnectionConfig>,
) -> Result<Response, ApiError> {
    let notice = state.settings.submit(form).await?;
    let settings = settings_view(&state.settings).await;
    Ok(respond(&headers, StatusCode::OK, &SettingsSaved { notice, settings }).await)
}

pub async fn test_connection(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let report = state.settings.test_connection().await;
    respond(&headers, StatusCode::OK, &report).await
}
