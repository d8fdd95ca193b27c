//! Resize/Redraw Lifecycle
//!
//! - **Debouncer**: cancellable delayed callback (trailing edge)
//! - **RedrawController**: mount, debounced resize redraws, unmount

mod debounce;
mod redraw;

pub use debounce::Debouncer;
pub use redraw::{RedrawController, RedrawEvent, RedrawState};
