//! Domain events module.
//!
//! Provides portfolio event types, the sink trait services emit through, and
//! [`EventHub`], an explicit subscription registry for UI layers that need to
//! react to state changes.

mod portfolio_event;
mod sink;

pub use portfolio_event::*;
pub use sink::*;
