//! Display state of the live reveal

use serde::{Deserialize, Serialize};

use td_core::{Color, TicketId, Variant};

/// Phase of a reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum RevealPhase {
    /// Nothing drawn, or reset
    #[default]
    Idle = 0,
    /// Random numbers and colors flashing
    Cycling = 1,
    /// Display frozen to the winner, overlay still shown
    Settling = 2,
    /// Winner settled (terminal for this draw)
    Revealed = 3,
}

impl RevealPhase {
    /// Cycling or settling: the reveal has not reached its terminal event yet
    #[inline]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RevealPhase::Cycling | RevealPhase::Settling)
    }
}

/// Snapshot of what a renderer should show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    /// Draw instance this state belongs to
    pub generation: u64,
    /// Winner being revealed; fixed for the whole draw
    pub target: Option<TicketId>,
    pub phase: RevealPhase,
    pub displayed_number: Option<u8>,
    pub displayed_variant: Option<Variant>,
    /// Cycling overlay color
    pub overlay_color: Option<Color>,
    /// Settled background color, set once revealed
    pub background_color: Option<Color>,
    /// Color the previous draw ended on; cycling started from it
    pub continuity_color: Option<Color>,
}

impl RevealState {
    /// Blank idle display
    pub fn idle(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    /// Fresh cycling display for a new draw
    pub fn cycling(generation: u64, target: TicketId, continuity: Option<Color>) -> Self {
        Self {
            generation,
            target: Some(target),
            phase: RevealPhase::Cycling,
            displayed_number: None,
            displayed_variant: None,
            overlay_color: Some(continuity.unwrap_or(Color::ALL[0])),
            background_color: None,
            continuity_color: continuity,
        }
    }

    /// Number shown right now: the cycling value, else the target's
    pub fn shown_number(&self) -> Option<u8> {
        self.displayed_number
            .or_else(|| self.target.map(|t| t.number()))
    }

    /// Variant shown right now: the cycling value, else the target's
    pub fn shown_variant(&self) -> Option<Variant> {
        self.displayed_variant
            .or_else(|| self.target.map(|t| t.variant()))
    }

    /// Two-digit number label, `--` when nothing is drawn
    pub fn number_label(&self) -> String {
        match self.shown_number() {
            Some(n) => format!("{:02}", n),
            None => "--".to_string(),
        }
    }

    /// Color a renderer should paint: overlay on top, else background
    pub fn visible_color(&self) -> Option<Color> {
        self.overlay_color.or(self.background_color)
    }
}
