//! WebSocket Resize Channel
//!
//! The chart page reports viewport changes over `/ws`; the server debounces
//! them and pushes back replacement SVG.
//!
//! ## Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8080/ws?page=' + chart.dataset.page);
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'mount', width: innerWidth, height: innerHeight}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'redraw') chart.innerHTML = msg.svg;
//! };
//! ```

mod handler;
mod messages;

pub use handler::{websocket_handler, WsParams};
pub use messages::{ClientMessage, ServerMessage};
