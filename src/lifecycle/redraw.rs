//! Resize/redraw state machine
//!
//! ```text
//! Idle --resize--> PendingRedraw --timer--> Redrawing --> Idle
//!                   ^        |
//!                   +-resize-+   (timer re-armed)
//! ```
//!
//! Each controller owns one container. Redraws are serialized by the lock
//! around it and always tear down the previous render first. Every armed
//! timer carries a sequence number; a timer that wakes after a newer one was
//! armed does nothing.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::debounce::Debouncer;
use crate::chart::{render, Container, RenderError, SharedViewport, Viewport};
use crate::config::ChartConfig;
use crate::source::Dataset;

/// Lifecycle state of a mounted chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawState {
    Idle,
    PendingRedraw,
    Redrawing,
}

/// Outcome of a (re)draw, published to the output channel
#[derive(Debug, Clone, PartialEq)]
pub enum RedrawEvent {
    Rendered { generation: u64, svg: String },
    Failed { generation: u64, error: RenderError },
}

struct Inner {
    state: RedrawState,
    container: Container,
    dataset: Dataset,
    config: ChartConfig,
    generation: u64,
    /// Sequence number of the most recently armed timer
    scheduled: u64,
    /// Sequence number of the last timer that redrew or was retired
    served: u64,
    last_redraw_at: Option<Instant>,
    output: Option<mpsc::UnboundedSender<RedrawEvent>>,
}

/// Drives mount, debounced resize redraws and unmount for one chart
pub struct RedrawController {
    inner: Arc<Mutex<Inner>>,
    viewport: SharedViewport,
    debouncer: Debouncer,
}

impl RedrawController {
    pub fn new(dataset: Dataset, config: ChartConfig, initial: Viewport) -> Self {
        let viewport = SharedViewport::new(initial);
        let container = Container::new(Arc::new(viewport.clone()), config.width, config.height);
        let debouncer = Debouncer::new(Duration::from_millis(config.debounce_ms));

        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: RedrawState::Idle,
                container,
                dataset,
                config,
                generation: 0,
                scheduled: 0,
                served: 0,
                last_redraw_at: None,
                output: None,
            })),
            viewport,
            debouncer,
        }
    }

    /// Builder method: publish every redraw to `output`
    pub fn with_output(self, output: mpsc::UnboundedSender<RedrawEvent>) -> Self {
        lock(&self.inner).output = Some(output);
        self
    }

    /// Render immediately, bypassing the debounce
    pub fn mount(&self) -> RedrawEvent {
        redraw(&self.inner)
    }

    /// Record a new viewport and (re)arm the debounced redraw
    pub fn resize(&self, viewport: Viewport) {
        self.viewport.set(viewport);

        let seq = {
            let mut inner = lock(&self.inner);
            if inner.state == RedrawState::Idle {
                tracing::trace!(width = viewport.width, height = viewport.height, "Redraw pending");
            }
            inner.scheduled += 1;
            inner.state = RedrawState::PendingRedraw;
            inner.scheduled
        };

        let inner = Arc::clone(&self.inner);
        self.debouncer.schedule(move || {
            redraw_scheduled(&inner, seq);
        });
    }

    /// Cancel any pending redraw and tear the chart down
    pub fn unmount(&self) {
        self.debouncer.cancel();
        let mut inner = lock(&self.inner);
        // Retire any timer that already woke up
        inner.scheduled += 1;
        inner.served = inner.scheduled;
        inner.container.clear();
        inner.state = RedrawState::Idle;
        tracing::debug!(generation = inner.generation, "Chart unmounted");
    }

    pub fn state(&self) -> RedrawState {
        lock(&self.inner).state
    }

    /// Number of completed (re)draws
    pub fn generation(&self) -> u64 {
        lock(&self.inner).generation
    }

    pub fn last_redraw_at(&self) -> Option<Instant> {
        lock(&self.inner).last_redraw_at
    }

    /// Live tooltip instances bound in the container
    pub fn live_tooltips(&self) -> usize {
        lock(&self.inner).container.registry().live()
    }

    /// Current rendered markup, if anything is mounted
    pub fn current_svg(&self) -> Option<String> {
        let inner = lock(&self.inner);
        if inner.container.children().is_empty() {
            return None;
        }
        inner.container.inner_svg().ok()
    }
}

impl Drop for RedrawController {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

/// Timer callback: redraw only if no newer timer was armed since `seq`
fn redraw_scheduled(shared: &Mutex<Inner>, seq: u64) -> Option<RedrawEvent> {
    let mut guard = lock(shared);
    if guard.scheduled != seq {
        tracing::trace!(seq, latest = guard.scheduled, "Superseded redraw skipped");
        return None;
    }
    guard.served = seq;
    Some(redraw_locked(&mut guard))
}

/// Tear down, recompute and redraw; publish the outcome
fn redraw(shared: &Mutex<Inner>) -> RedrawEvent {
    redraw_locked(&mut lock(shared))
}

fn redraw_locked(inner: &mut Inner) -> RedrawEvent {
    inner.state = RedrawState::Redrawing;
    inner.generation += 1;
    inner.last_redraw_at = Some(Instant::now());
    let generation = inner.generation;

    let result = render(&mut inner.container, &inner.dataset, &inner.config)
        .and_then(|_| inner.container.inner_svg());

    let event = match result {
        Ok(svg) => {
            tracing::debug!(generation, bytes = svg.len(), "Chart redrawn");
            RedrawEvent::Rendered { generation, svg }
        }
        Err(error) => {
            tracing::warn!(generation, error = %error, "Chart redraw failed");
            RedrawEvent::Failed { generation, error }
        }
    };

    if let Some(output) = &inner.output {
        if output.send(event.clone()).is_err() {
            tracing::debug!(generation, "Redraw output closed");
            inner.output = None;
        }
    }

    // A mount during a pending resize leaves that timer armed
    inner.state = if inner.served < inner.scheduled {
        RedrawState::PendingRedraw
    } else {
        RedrawState::Idle
    };
    event
}
