use crate::plex::PlexWebhookEvent;
use crate::processor::QueuedEvent;
use crate::server::AppContext;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tokio::sync::mpsc::error::TrySendError;

/// Name of the multipart field Plex puts the JSON event in.
const PAYLOAD_FIELD: &str = "payload";

pub fn webhook_routes() -> Router<AppContext> {
    Router::new().route("/webhook", post(handle_webhook))
}

async fn handle_webhook(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut payload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid multipart body: {}", e),
        )
    })? {
        if field.name() == Some(PAYLOAD_FIELD) {
            let text = field.text().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Unreadable payload field: {}", e),
                )
            })?;
            payload = Some(text);
        }
    }

    let payload = payload.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("Missing {} field", PAYLOAD_FIELD),
        )
    })?;

    let event = PlexWebhookEvent::from_json(&payload)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    tracing::info!(
        "Received Plex webhook: {} for {}",
        event.event,
        event
            .metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .unwrap_or("unknown")
    );

    let queued = QueuedEvent::new(event);
    let id = queued.id;
    let name = queued.event.event.clone();
    match ctx.events.try_send(queued) {
        Ok(()) => Ok(Json(serde_json::json!({
            "status": "queued",
            "id": id,
            "event": name
        }))),
        Err(TrySendError::Full(_)) => {
            tracing::warn!("Event queue full, dropping {}", name);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "Event queue is full".to_string(),
            ))
        }
        Err(TrySendError::Closed(_)) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Event processor is not running".to_string(),
        )),
    }
}
