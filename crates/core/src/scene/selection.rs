//! Selection of a holding in the scene, with its scheduled dismissal.
//!
//! Every `select` starts a new generation. Timers carry the generation they
//! were scheduled for and do nothing once a newer selection exists, and the
//! controller also aborts the superseded timer task outright.

use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::constants::{SELECTION_AUTO_DISMISS, SELECTION_CLEAR_DELAY};
use crate::events::{PortfolioEvent, PortfolioEventSink};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub symbol: Option<String>,
    pub showing_detail: bool,
}

impl SelectionState {
    fn event(&self) -> PortfolioEvent {
        PortfolioEvent::SelectionChanged {
            symbol: self.symbol.clone(),
            showing_detail: self.showing_detail,
        }
    }
}

#[derive(Default)]
struct Inner {
    state: SelectionState,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl Inner {
    fn replace_timer(&mut self, timer: Option<JoinHandle<()>>) {
        if let Some(old) = std::mem::replace(&mut self.timer, timer) {
            old.abort();
        }
    }
}

/// Selection state machine. Cheap to clone; clones share state.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct SelectionController {
    inner: Arc<Mutex<Inner>>,
    event_sink: Arc<dyn PortfolioEventSink>,
    auto_dismiss: Duration,
    clear_delay: Duration,
}

impl SelectionController {
    pub fn new(event_sink: Arc<dyn PortfolioEventSink>) -> Self {
        Self::with_timing(event_sink, SELECTION_AUTO_DISMISS, SELECTION_CLEAR_DELAY)
    }

    pub fn with_timing(
        event_sink: Arc<dyn PortfolioEventSink>,
        auto_dismiss: Duration,
        clear_delay: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            event_sink,
            auto_dismiss,
            clear_delay,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.inner
            .lock()
            .map(|inner| inner.state.clone())
            .unwrap_or_default()
    }

    pub fn selected_symbol(&self) -> Option<String> {
        self.state().symbol
    }

    pub fn is_showing_detail(&self) -> bool {
        self.state().showing_detail
    }

    /// Selects `symbol`, shows its detail and schedules the auto-dismiss.
    /// Any pending timer from an earlier selection is cancelled.
    pub fn select(&self, symbol: &str) {
        let event = {
            let Ok(mut inner) = self.inner.lock() else {
                return;
            };
            inner.generation += 1;
            inner.state = SelectionState {
                symbol: Some(symbol.to_string()),
                showing_detail: true,
            };
            let timer = self.spawn_auto_dismiss(inner.generation);
            inner.replace_timer(Some(timer));
            inner.state.event()
        };
        debug!("Selected {}", symbol);
        self.event_sink.emit(event);
    }

    /// Hides the detail now and clears the selection after the clear delay.
    pub fn dismiss(&self) {
        let event = {
            let Ok(mut inner) = self.inner.lock() else {
                return;
            };
            self.hide(&mut inner)
        };
        if let Some(event) = event {
            self.event_sink.emit(event);
        }
    }

    /// Clears the selection immediately and cancels every timer.
    pub fn reset(&self) {
        let event = {
            let Ok(mut inner) = self.inner.lock() else {
                return;
            };
            inner.generation += 1;
            inner.replace_timer(None);
            if inner.state == SelectionState::default() {
                None
            } else {
                inner.state = SelectionState::default();
                Some(inner.state.event())
            }
        };
        if let Some(event) = event {
            self.event_sink.emit(event);
        }
    }

    /// Returns the event to emit, or None if nothing was showing.
    fn hide(&self, inner: &mut Inner) -> Option<PortfolioEvent> {
        if !inner.state.showing_detail {
            return None;
        }
        inner.state.showing_detail = false;
        let timer = self.spawn_clear(inner.generation);
        inner.replace_timer(Some(timer));
        Some(inner.state.event())
    }

    fn spawn_auto_dismiss(&self, generation: u64) -> JoinHandle<()> {
        let controller = self.clone();
        let delay = self.auto_dismiss;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let event = {
                let Ok(mut inner) = controller.inner.lock() else {
                    return;
                };
                if inner.generation != generation {
                    return;
                }
                // This task's own handle; dropping it does not abort
                inner.timer.take();
                controller.hide(&mut inner)
            };
            if let Some(event) = event {
                debug!("Selection auto-dismissed");
                controller.event_sink.emit(event);
            }
        })
    }

    fn spawn_clear(&self, generation: u64) -> JoinHandle<()> {
        let controller = self.clone();
        let delay = self.clear_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let event = {
                let Ok(mut inner) = controller.inner.lock() else {
                    return;
                };
                if inner.generation != generation {
                    return;
                }
                inner.timer.take();
                inner.state.symbol = None;
                inner.state.event()
            };
            controller.event_sink.emit(event);
        })
    }
}
