//! Winning list: drawn tickets in draw order

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use td_core::TicketId;

/// One drawn ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRecord {
    pub ticket: TicketId,
    /// Wall-clock time the reveal settled
    pub drawn_at: DateTime<Utc>,
}

/// Append-only list of won tickets, cleared only by a session reset
#[derive(Debug, Clone, Default, Serialize)]
pub struct WinningList {
    records: Vec<WinRecord>,
}

impl WinningList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a win now
    pub(crate) fn push(&mut self, ticket: TicketId) -> WinRecord {
        debug_assert!(!self.contains(&ticket), "{} drawn twice", ticket);
        let record = WinRecord {
            ticket,
            drawn_at: Utc::now(),
        };
        self.records.push(record);
        record
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, ticket: &TicketId) -> bool {
        self.records.iter().any(|r| &r.ticket == ticket)
    }

    /// Records in draw order
    pub fn records(&self) -> &[WinRecord] {
        &self.records
    }

    /// Tickets in draw order
    pub fn tickets(&self) -> impl Iterator<Item = TicketId> + '_ {
        self.records.iter().map(|r| r.ticket)
    }

    /// Records newest first, as the history list shows them
    pub fn recent_first(&self) -> impl Iterator<Item = &WinRecord> + '_ {
        self.records.iter().rev()
    }

    pub fn last(&self) -> Option<&WinRecord> {
        self.records.last()
    }
}
