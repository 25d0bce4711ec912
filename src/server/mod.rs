use crate::config::{Config, ServerConfig};
use crate::processor::QueuedEvent;
use anyhow::{Context, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

pub mod routes_webhook;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Producer side of the event queue
    pub events: mpsc::Sender<QueuedEvent>,
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(routes_webhook::webhook_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server; returns after a shutdown signal.
pub async fn start_server(ctx: AppContext) -> Result<()> {
    let addr = bind_addr(&ctx.config.server).await?;

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Socket address to listen on. IP literals of either family are used as-is;
/// anything else is resolved as a hostname.
pub async fn bind_addr(server: &ServerConfig) -> Result<SocketAddr> {
    if let Ok(ip) = server.host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, server.port));
    }

    tokio::net::lookup_host((server.host.as_str(), server.port))
        .await
        .with_context(|| format!("Invalid server address: {}", server.host))?
        .next()
        .with_context(|| format!("Server address resolved to nothing: {}", server.host))
}

/// URL Plex should post webhooks to.
///
/// A wildcard bind address is replaced by the address of the interface used
/// for outbound traffic.
pub fn webhook_url(server: &ServerConfig) -> String {
    let host = match server.host.as_str() {
        "0.0.0.0" => interface_ip(false).to_string(),
        "::" => format!("[{}]", interface_ip(true)),
        other => other.to_string(),
    };
    format!("http://{}:{}/webhook", host, server.port)
}

/// Local address of the interface that would route to a private address.
/// Nothing is sent; connecting a UDP socket only picks the route.
fn interface_ip(v6: bool) -> IpAddr {
    let (bind, probe, fallback): (SocketAddr, SocketAddr, IpAddr) = if v6 {
        (
            (Ipv6Addr::UNSPECIFIED, 0).into(),
            (Ipv6Addr::new(0xfd31, 0xf903, 0x5ab5, 1, 0, 0, 0, 1), 58162).into(),
            Ipv6Addr::LOCALHOST.into(),
        )
    } else {
        (
            (Ipv4Addr::UNSPECIFIED, 0).into(),
            (Ipv4Addr::new(10, 253, 155, 219), 58162).into(),
            Ipv4Addr::LOCALHOST.into(),
        )
    };

    UdpSocket::bind(bind)
        .and_then(|socket| {
            socket.connect(probe)?;
            socket.local_addr()
        })
        .map(|addr| addr.ip())
        .unwrap_or(fallback)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
