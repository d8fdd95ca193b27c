//! WebSocket Message Types
//!
//! Defines all message types exchanged between the chart page and the
//! server.

use serde::{Deserialize, Serialize};

use crate::lifecycle::RedrawEvent;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// First frame: the page's viewport at load, rendered without delay
    Mount {
        /// Viewport width in CSS pixels
        width: f64,
        /// Viewport height in CSS pixels
        height: f64,
    },
    /// The browser viewport changed size
    Resize {
        /// Viewport width in CSS pixels
        width: f64,
        /// Viewport height in CSS pixels
        height: f64,
    },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
    /// Replacement chart markup
    Redraw {
        /// Monotonic redraw counter for this connection
        generation: u64,
        /// SVG markup for the chart container
        svg: String,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}

impl From<RedrawEvent> for ServerMessage {
    fn from(event: RedrawEvent) -> Self {
        match event {
            RedrawEvent::Rendered { generation, svg } => ServerMessage::Redraw { generation, svg },
            RedrawEvent::Failed { error, .. } => ServerMessage::Error {
                message: error.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RenderError;

    #[test]
    fn test_client_message_deserialize_resize() {
        let json = r#"{"type": "resize", "width": 1280, "height": 720.5}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Resize { width, height } => {
                assert_eq!(width, 1280.0);
                assert_eq!(height, 720.5);
            }
            _ => panic!("Expected Resize"),
        }
    }

    #[test]
    fn test_client_message_deserialize_mount() {
        let json = r#"{"type": "mount", "width": 390, "height": 844}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Mount { width, height } if width == 390.0 && height == 844.0
        ));
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_server_message_serialize_redraw() {
        let msg = ServerMessage::from(RedrawEvent::Rendered {
            generation: 3,
            svg: "<svg/>".to_string(),
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"redraw","generation":3,"svg":"<svg/>"}"#);
    }

    #[test]
    fn test_failed_redraw_becomes_error() {
        let msg = ServerMessage::from(RedrawEvent::Failed {
            generation: 1,
            error: RenderError::EmptyContainer {
                width: 0.0,
                height: 0.0,
            },
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"error\""));
        assert!(json.contains("no drawable area"));
    }
}
