//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and manages the connection lifecycle.
//! Each connection claims the dataset its page was rendered from, mounts a
//! chart at the first viewport the page reports, and forwards debounced
//! redraws back to the page.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::messages::{ClientMessage, ServerMessage};
use crate::api::dto::validate_dimension;
use crate::api::AppState;
use crate::chart::Viewport;
use crate::config::ChartConfig;
use crate::lifecycle::{RedrawController, RedrawEvent};
use crate::source::Dataset;

/// Query parameters of `/ws`
#[derive(Debug, Default, Deserialize)]
pub struct WsParams {
    /// Token of the page that opened the socket
    pub page: Option<String>,
}

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(params): Query<WsParams>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params.page))
}

/// What to do after handling one incoming frame
#[derive(Debug, PartialEq)]
pub(crate) enum Flow {
    Continue,
    Reply(ServerMessage),
    Close,
}

/// Dataset for a new connection
///
/// A page token claims the dataset the page was rendered from. Clients that
/// did not come from a page load the dataset themselves.
pub(crate) async fn load_dataset(state: &AppState, page: Option<&str>) -> Result<Dataset, String> {
    match page {
        Some(token) => state
            .pages
            .take(token)
            .ok_or_else(|| "Page expired, reload to continue".to_string()),
        None => state.source.fetch().await.map_err(|e| e.to_string()),
    }
}

/// Chart owned by one connection, created on the first reported viewport
pub(crate) struct ChartSession {
    dataset: Dataset,
    config: ChartConfig,
    output: mpsc::UnboundedSender<RedrawEvent>,
    controller: Option<RedrawController>,
}

impl ChartSession {
    pub(crate) fn new(
        dataset: Dataset,
        config: ChartConfig,
        output: mpsc::UnboundedSender<RedrawEvent>,
    ) -> Self {
        Self {
            dataset,
            config,
            output,
            controller: None,
        }
    }

    /// Mount right away on the first viewport; debounce every later one
    fn viewport_changed(&mut self, viewport: Viewport) {
        match &self.controller {
            Some(controller) => controller.resize(viewport),
            None => {
                let controller =
                    RedrawController::new(self.dataset.clone(), self.config.clone(), viewport)
                        .with_output(self.output.clone());
                controller.mount();
                self.controller = Some(controller);
            }
        }
    }

    pub(crate) fn controller(&self) -> Option<&RedrawController> {
        self.controller.as_ref()
    }

    fn unmount(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.unmount();
        }
    }
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, page: Option<String>) {
    let connection_id = uuid::Uuid::new_v4().to_string();
    let (mut sender, mut receiver) = socket.split();

    let dataset = match load_dataset(&state, page.as_deref()).await {
        Ok(dataset) => dataset,
        Err(message) => {
            tracing::warn!(connection_id = %connection_id, error = %message, "No dataset for connection");
            let _ = send(&mut sender, &ServerMessage::Error { message }).await;
            return;
        }
    };

    let (tx, mut redraws) = mpsc::unbounded_channel();
    let mut session = ChartSession::new(dataset, state.config.chart.clone(), tx);

    let connected = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    if send(&mut sender, &connected).await.is_err() {
        tracing::debug!(connection_id = %connection_id, "Failed to send connected message");
        return;
    }

    tracing::debug!(connection_id = %connection_id, page = ?page, "WebSocket connected");

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let message = match incoming {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket receive error");
                        break;
                    }
                    None => break,
                };

                match handle_ws_message(&mut session, message) {
                    Flow::Continue => {}
                    Flow::Reply(reply) => {
                        if send(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                    Flow::Close => break,
                }
            }
            Some(event) = redraws.recv() => {
                if send(&mut sender, &ServerMessage::from(event)).await.is_err() {
                    tracing::debug!(connection_id = %connection_id, "WebSocket send failed, closing connection");
                    break;
                }
            }
        }
    }

    session.unmount();
    tracing::debug!(connection_id = %connection_id, "WebSocket disconnected");
}

async fn send(sender: &mut SplitSink<WebSocket, Message>, message: &ServerMessage) -> Result<(), ()> {
    let text = serde_json::to_string(message).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize message");
    })?;
    sender.send(Message::Text(text)).await.map_err(|_| ())
}

/// Handle a received WebSocket frame
pub(crate) fn handle_ws_message(session: &mut ChartSession, message: Message) -> Flow {
    match message {
        Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(client_msg) => handle_client_message(session, client_msg),
            Err(e) => {
                tracing::debug!(error = %e, text = %text, "Invalid client message");
                Flow::Reply(ServerMessage::Error {
                    message: format!("Invalid message format: {}", e),
                })
            }
        },
        Message::Binary(_) => Flow::Reply(ServerMessage::Error {
            message: "Binary messages not supported".to_string(),
        }),
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => Flow::Continue,
        Message::Close(_) => Flow::Close,
    }
}

/// Handle a parsed client message
fn handle_client_message(session: &mut ChartSession, message: ClientMessage) -> Flow {
    match message {
        ClientMessage::Mount { width, height } | ClientMessage::Resize { width, height } => {
            let checked = validate_dimension("width", width)
                .and_then(|w| validate_dimension("height", height).map(|h| (w, h)));
            match checked {
                Ok((w, h)) => {
                    session.viewport_changed(Viewport::new(w, h));
                    Flow::Continue
                }
                Err(message) => Flow::Reply(ServerMessage::Error { message }),
            }
        }
        ClientMessage::Ping => Flow::Reply(ServerMessage::Pong),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::lifecycle::RedrawState;
    use crate::source::{DataSource, SourceResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session() -> (ChartSession, mpsc::UnboundedReceiver<RedrawEvent>) {
        let dataset = Dataset::from_pairs(&[("1947-01-01", 243.1)]).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        (ChartSession::new(dataset, ChartConfig::default(), tx), rx)
    }

    fn text(json: &str) -> Message {
        Message::Text(json.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_frame_mounts_at_reported_viewport() {
        let (mut session, mut rx) = session();
        let flow = handle_ws_message(&mut session, text(r#"{"type":"mount","width":640,"height":480}"#));
        assert_eq!(flow, Flow::Continue);

        // Rendered synchronously, no debounce wait
        match rx.try_recv().unwrap() {
            RedrawEvent::Rendered { generation, svg } => {
                assert_eq!(generation, 1);
                // 75vw of 640 plus 2 * 50 offset
                assert!(svg.contains("width=\"580\""));
                assert!(svg.contains("rotate(45)"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(session.controller().unwrap().state(), RedrawState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_before_mount_mounts() {
        let (mut session, mut rx) = session();
        handle_ws_message(&mut session, text(r#"{"type":"resize","width":1000,"height":700}"#));
        assert!(matches!(rx.try_recv(), Ok(RedrawEvent::Rendered { generation: 1, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_after_mount_is_debounced() {
        let (mut session, mut rx) = session();
        handle_ws_message(&mut session, text(r#"{"type":"mount","width":1280,"height":800}"#));
        rx.try_recv().unwrap();

        let flow = handle_ws_message(&mut session, text(r#"{"type":"resize","width":640,"height":480}"#));
        assert_eq!(flow, Flow::Continue);
        assert_eq!(session.controller().unwrap().state(), RedrawState::PendingRedraw);
        assert!(rx.try_recv().is_err());

        match rx.recv().await.unwrap() {
            RedrawEvent::Rendered { generation, .. } => assert_eq!(generation, 2),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_resize_rejected() {
        let (mut session, _rx) = session();
        let flow = handle_ws_message(&mut session, text(r#"{"type":"resize","width":0,"height":480}"#));

        assert!(matches!(flow, Flow::Reply(ServerMessage::Error { .. })));
        assert!(session.controller().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ping_and_garbage() {
        let (mut session, _rx) = session();

        let flow = handle_ws_message(&mut session, text(r#"{"type":"ping"}"#));
        assert!(matches!(flow, Flow::Reply(ServerMessage::Pong)));

        let flow = handle_ws_message(&mut session, text("hello"));
        assert!(matches!(flow, Flow::Reply(ServerMessage::Error { .. })));

        let flow = handle_ws_message(&mut session, Message::Close(None));
        assert_eq!(flow, Flow::Close);
    }

    /// Static source that counts its fetches
    struct CountingSource {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl DataSource for CountingSource {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        async fn fetch(&self) -> SourceResult<Dataset> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Dataset::from_pairs(&[("1947-01-01", 243.1)])
        }
    }

    #[tokio::test]
    async fn test_page_token_claims_stored_dataset() {
        let source = Arc::new(CountingSource {
            fetches: AtomicUsize::new(0),
        });
        let state = AppState::new(source.clone(), Config::default());
        let stored = Dataset::from_pairs(&[("1999-10-01", 9000.0)]).unwrap();
        let token = state.pages.insert(stored.clone());

        assert_eq!(load_dataset(&state, Some(&token)).await, Ok(stored));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);

        // Tokens are single use
        assert!(load_dataset(&state, Some(&token)).await.is_err());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);

        assert!(load_dataset(&state, None).await.is_ok());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }
}
