//! # td-reveal: Reveal timeline
//!
//! Drives the presentation of a drawn ticket over a fixed wall-clock schedule:
//!
//! ```text
//! start(ticket)
//!   │  Cycling   number/variant every 70ms, color every 900ms (after 50ms)
//!   ▼  +2000ms
//!   │  Settling  display frozen to the ticket, overlay shows its color
//!   ▼  +100ms
//!   │  Revealed  background set, terminal event emitted once
//!   ▼  +600ms
//!      overlay cleared
//! ```
//!
//! Each effect is a tokio task owned by the timeline. Starting again,
//! resetting or dropping the timeline aborts all of them at once.

pub mod event;
pub mod state;
pub mod timeline;
pub mod timing;

pub use event::*;
pub use state::*;
pub use timeline::*;
pub use timing::*;
