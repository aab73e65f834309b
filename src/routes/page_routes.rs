use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::config::AppConfig;
use crate::services::static_service;

//
// ─────────────────────────────────────────────────────────────
// GET /
// Index page
// ─────────────────────────────────────────────────────────────
//
pub async fn index(State(cfg): State<AppConfig>) -> Response {
    send_page(&cfg, &cfg.index_page, StatusCode::OK).await
}

//
// ─────────────────────────────────────────────────────────────
// GET /messages
// Message form page
// ─────────────────────────────────────────────────────────────
//
pub async fn messages(State(cfg): State<AppConfig>) -> Response {
    send_page(&cfg, &cfg.messages_page, StatusCode::OK).await
}

//
// ─────────────────────────────────────────────────────────────
// GET <anything else>
// Static file lookup under base_dir, 404 error page otherwise
// ─────────────────────────────────────────────────────────────
//
pub async fn static_asset(State(cfg): State<AppConfig>, uri: Uri) -> Response {
    let Some(path) = static_service::resolve(&cfg.base_dir, uri.path()) else {
        // Path tried to escape base_dir; answer as if it doesn't exist.
        return send_page(&cfg, &cfg.error_page, StatusCode::NOT_FOUND).await;
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let content_type = static_service::content_type(&path);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type.to_string())],
                bytes,
            )
                .into_response()
        }
        Err(_) => send_page(&cfg, &cfg.error_page, StatusCode::NOT_FOUND).await,
    }
}

/// Serve one of the fixed HTML pages from base_dir.
async fn send_page(cfg: &AppConfig, page: &str, status: StatusCode) -> Response {
    let path = std::path::Path::new(&cfg.base_dir).join(page);

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, mime::TEXT_HTML.to_string())],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to read page {}: {}", path.display(), e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
