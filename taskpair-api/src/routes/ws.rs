/// WebSocket notification channel
///
/// # Endpoint
///
/// ```text
/// GET /v1/ws?token=<jwt>
/// ```
///
/// The channel is push-only: the server sends `notification` frames (see
/// [`taskpair_shared::notify::event`]) and ignores any client payloads
/// other than close. Authentication happens at handshake time, before
/// the upgrade; browsers cannot set an Authorization header on a
/// WebSocket, so the `token` query parameter is the primary mechanism
/// and the Bearer header is the fallback for non-browser clients.
///
/// One connection is one session in the gateway; a user with several
/// tabs holds several sessions, and each receives every notification
/// addressed to that user.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{app::AppState, error::ApiResult};
use taskpair_shared::{
    auth::{jwt, middleware::extract_bearer_token},
    notify::NotificationGateway,
};

/// Handshake query parameters
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Session token; falls back to the Authorization header if absent
    pub token: Option<String>,
}

/// WebSocket upgrade handler
///
/// # Errors
///
/// Returns 401 Unauthorized before upgrading when no credential is
/// presented or the token is invalid or expired.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let claims = match query.token {
        Some(ref token) => jwt::validate_token(token, state.jwt_secret())?,
        None => {
            let token = extract_bearer_token(&headers)?;
            jwt::validate_token(token, state.jwt_secret())?
        }
    };

    let user_id = claims.sub;
    let gateway = state.notifier.clone();

    Ok(ws.on_upgrade(move |socket| serve_socket(socket, gateway, user_id)))
}

/// Pumps gateway notifications into the socket until either side closes
///
/// The session is registered before the first poll and unregistered on
/// every exit path, so a dropped connection can never leak a registry
/// entry.
async fn serve_socket(mut socket: WebSocket, gateway: NotificationGateway, user_id: Uuid) {
    let (session_id, mut notifications) = gateway.register(user_id);
    debug!(%user_id, session_id, "Notification channel open");

    loop {
        tokio::select! {
            outgoing = notifications.recv() => {
                let Some(notification) = outgoing else {
                    break;
                };

                let frame = match serde_json::to_string(&notification) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(%user_id, "Failed to encode notification: {}", e);
                        continue;
                    }
                };

                if socket.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Push-only channel: client frames carry no meaning
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    gateway.unregister(user_id, session_id);
    debug!(%user_id, session_id, "Notification channel closed");
}
