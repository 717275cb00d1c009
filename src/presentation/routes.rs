// Router construction
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    clear_import, clear_sync, get_settings, health_check, import_board, import_events,
    list_import_files, pick_file, refresh_sync, set_auto_refresh, set_import_kind, set_sync_kind,
    submit_settings, sync_board, sync_events, test_connection, upload_file,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Base64 inflates uploads by a third, plus some room for the JSON envelope
fn upload_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes / 3 * 4 + 4096
}

pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/sync", get(sync_board))
        .route("/sync/refresh", post(refresh_sync))
        .route("/sync/auto-refresh", put(set_auto_refresh))
        .route("/sync/kind", put(set_sync_kind))
        .route("/sync/dataset", delete(clear_sync))
        .route("/sync/events", get(sync_events))
        .route("/import", get(import_board))
        .route("/import/files", get(list_import_files))
        .route("/import/upload", post(upload_file))
        .route("/import/pick", post(pick_file))
        .route("/import/kind", put(set_import_kind))
        .route("/import/dataset", delete(clear_import))
        .route("/import/events", get(import_events))
        .route("/settings", get(get_settings).put(submit_settings))
        .route("/settings/test", post(test_connection))
        .layer(DefaultBodyLimit::max(upload_body_limit(max_upload_bytes)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
