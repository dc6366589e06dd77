//! td-core: Shared types for the Ticket Draw workspace
//!
//! Every other crate speaks in terms of [`Color`], [`Variant`] and
//! [`TicketId`], and reports failures through [`TdError`].

mod error;
mod ticket;

pub use error::*;
pub use ticket::*;

/// Lowest ticket number that can be sold
pub const MIN_TICKET_NUMBER: u8 = 1;

/// Highest ticket number that can be sold
pub const MAX_TICKET_NUMBER: u8 = 100;
