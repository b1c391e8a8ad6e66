use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use holdem_ws::actor::{ActorMsg, TableActor};
use holdem_ws::protocol::{ClientEvent, ServerEvent};

#[derive(Clone)]
struct AppState {
    actor: mpsc::UnboundedSender<ActorMsg>,
    next_viewer: Arc<AtomicU64>,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    // Viewer ids are transport-assigned and opaque to clients.
    let viewer = format!("p{}", state.next_viewer.fetch_add(1, Ordering::Relaxed) + 1);
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (client_tx, mut client_rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        while let Some(json) = client_rx.recv().await {
            if ws_tx.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    if state
        .actor
        .send(ActorMsg::Connect {
            viewer: viewer.clone(),
            tx: client_tx.clone(),
        })
        .is_err()
    {
        return;
    }

    while let Some(Ok(msg)) = ws_rx.next().await {
        let Message::Text(text) = msg else { continue };
        match serde_json::from_str::<ClientEvent>(&text) {
            Ok(event) => {
                let _ = state.actor.send(ActorMsg::Event {
                    viewer: viewer.clone(),
                    event,
                });
            }
            Err(_) => {
                let event = ServerEvent::ErrorMessage {
                    message: "Malformed message".to_string(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    let _ = client_tx.send(json);
                }
            }
        }
    }

    let _ = state.actor.send(ActorMsg::Disconnect { viewer });
    drop(client_tx);
    let _ = writer.await;
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let state = AppState {
        actor: TableActor::spawn(),
        next_viewer: Arc::new(AtomicU64::new(0)),
    };
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .fallback_service(ServeDir::new("public"))
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!(%addr, "starting table server");
    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind");
    axum::serve(listener, app).await.expect("serve");
}
