use super::dto::TickPayload;
use crate::announcer::{Announcer, TickAck};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub const TICK_PATH: &str = "/tick";

pub fn router(announcer: Arc<Announcer>) -> Router {
    Router::new()
        .route(TICK_PATH, post(handle_tick))
        .with_state(announcer)
}

async fn handle_tick(
    State(announcer): State<Arc<Announcer>>,
    Json(payload): Json<TickPayload>,
) -> Response {
    info!("Tick received. Fetching events...");

    // The job handle is dropped here, the job keeps running on its own
    let ack = announcer.tick(&payload).ack;

    let status = match ack {
        TickAck::NoTarget => StatusCode::UNPROCESSABLE_ENTITY,
        TickAck::Accepted { .. } | TickAck::AlreadyRunning { .. } => StatusCode::ACCEPTED,
    };

    (status, Json(ack)).into_response()
}

pub async fn serve(address: SocketAddr, announcer: Arc<Announcer>) -> io::Result<()> {
    let listener = TcpListener::bind(address).await?;

    info!("Listening at http://{}", address);

    axum::serve(listener, router(announcer))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Couldn't listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }

    info!("Shutting down");
}
