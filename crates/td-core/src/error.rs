//! Error types

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum TdError {
    #[error("Ticket pool is empty")]
    EmptyPool,

    #[error("No available tickets to draw, configure sold ticket ranges first")]
    NoTicketsAvailable,

    #[error("A draw is already in progress")]
    DrawInFlight,

    #[error("Invalid ticket number: {0} (expected 1-100)")]
    InvalidTicketNumber(u8),

    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Unknown variant: {0}")]
    UnknownVariant(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type TdResult<T> = Result<T, TdError>;
