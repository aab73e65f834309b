use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::net::UdpSocket;

use crate::config::AppConfig;

//
// ─────────────────────────────────────────────────────────────
// POST <any path>
// Relay the body to the store writer, then redirect
// ─────────────────────────────────────────────────────────────
//
/// Exactly `Content-Length` bytes of the body are forwarded as one
/// datagram. The send is fire-and-forget: the 302 goes out whether
/// or not the datagram arrives, and the client cannot tell a stored
/// submission from a dropped one.
pub async fn submit(
    State(cfg): State<AppConfig>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .ok_or(StatusCode::LENGTH_REQUIRED)?;

    let data = &body[..length.min(body.len())];
    relay_datagram(&cfg, data).await;

    Ok((StatusCode::FOUND, [(header::LOCATION, "/messages")]).into_response())
}

/// One ephemeral socket per submission, like a one-shot sendto.
async fn relay_datagram(cfg: &AppConfig, data: &[u8]) {
    let target = (cfg.socket_host.as_str(), cfg.socket_port);

    match UdpSocket::bind("0.0.0.0:0").await {
        Ok(socket) => {
            if let Err(e) = socket.send_to(data, target).await {
                tracing::warn!("Failed to relay submission datagram: {}", e);
            }
        }
        Err(e) => {
            tracing::warn!("Failed to open datagram socket: {}", e);
        }
    }
}
