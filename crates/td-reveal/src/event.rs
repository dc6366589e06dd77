//! RevealEvent: a timeline transition with its draw instance and timing

use serde::{Deserialize, Serialize};

use td_core::{Color, TicketId};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealEventKind {
    /// Cycling began
    Started,
    /// Cyclers stopped, display frozen to the winner
    Settling,
    /// Winner settled; emitted exactly once per uncancelled draw
    Revealed,
    /// Overlay faded out, the winner's color is final
    OverlayCleared,
}

/// A timeline transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealEvent {
    pub kind: RevealEventKind,

    /// Draw instance that produced the event
    pub generation: u64,

    /// Ticket being revealed
    pub ticket: TicketId,

    /// Milliseconds since the draw started
    pub elapsed_ms: u64,
}

impl RevealEvent {
    pub fn new(kind: RevealEventKind, generation: u64, ticket: TicketId, elapsed_ms: u64) -> Self {
        Self {
            kind,
            generation,
            ticket,
            elapsed_ms,
        }
    }

    /// The terminal "winner settled" event
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.kind == RevealEventKind::Revealed
    }

    /// Color the event settles on
    #[inline]
    pub fn color(&self) -> Color {
        self.ticket.color()
    }
}
