//! # td-pool: Ticket pool model
//!
//! Turns free-text "sold ranges" into the exact set of drawable tickets and
//! picks winners from it.
//!
//! ```text
//! RangeSpec ──parse_ranges──▶ numbers per (color, variant)
//!     │
//!     └── minus won tickets ──▶ available_tickets ──▶ Selector::pick
//! ```
//!
//! The pool is never stored: it is recomputed from its two inputs on every
//! read, so it cannot go stale.

pub mod pool;
pub mod range;
pub mod range_spec;
pub mod selector;

pub use pool::*;
pub use range::*;
pub use range_spec::*;
pub use selector::*;
