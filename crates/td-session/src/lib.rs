//! # td-session: Draw session controller
//!
//! [`DrawSession`] is the single owner of everything a draw mutates: the sold
//! ranges, the win list, the continuity color and the live reveal. All
//! mutation goes through [`DrawSession::draw`], [`DrawSession::reset`] and
//! [`DrawSession::set_ranges`].
//!
//! ```text
//! RangeSpec + WinningList ─▶ pool ─▶ Selector ─▶ RevealTimeline
//!                                                     │ Revealed
//!      WinningList.push ◀── DrawSession ◀─────────────┘
//!                              │
//!                              └─▶ SessionEvent (cues, confetti)
//! ```

pub mod config;
pub mod history;
pub mod session;

pub use config::*;
pub use history::*;
pub use session::*;
