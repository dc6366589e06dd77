//! Ticket identity: color, variant and number

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MAX_TICKET_NUMBER, MIN_TICKET_NUMBER, TdError, TdResult};

// ═══════════════════════════════════════════════════════════════════════════════
// COLOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Ticket roll color
///
/// The declaration order is the display cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Blue = 1,
    Green = 2,
    Yellow = 3,
    White = 4,
}

impl Color {
    /// All colors in cycling order
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::White,
    ];

    /// Position in the cycling order
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Color at a position, wrapping around
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Next color in the cycle (White wraps to Red)
    #[inline]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Lowercase name, as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::White => "white",
        }
    }

    /// Display color for renderers
    pub fn color_hex(self) -> &'static str {
        match self {
            Color::Red => "#ef5350",
            Color::Blue => "#42a5f5",
            Color::Green => "#66bb6a",
            Color::Yellow => "#ffca28",
            Color::White => "#ffffff",
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::Red
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Color {
    type Err = TdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TdError::UnknownColor(wanted.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VARIANT
// ═══════════════════════════════════════════════════════════════════════════════

/// Ticket variant printed next to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Variant {
    A = 0,
    B = 1,
}

impl Variant {
    /// Both variants in order
    pub const ALL: [Variant; 2] = [Variant::A, Variant::B];

    /// The other variant
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Variant::A => Variant::B,
            Variant::B => Variant::A,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::A => "A",
            Variant::B => "B",
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::A
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Variant {
    type Err = TdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Variant::A),
            "B" | "b" => Ok(Variant::B),
            other => Err(TdError::UnknownVariant(other.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TICKET ID
// ═══════════════════════════════════════════════════════════════════════════════

/// A sold, drawable ticket
///
/// Immutable; the number is guaranteed to lie in 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTicket")]
pub struct TicketId {
    color: Color,
    variant: Variant,
    number: u8,
}

impl TicketId {
    /// Create a ticket, rejecting numbers outside 1..=100
    pub fn new(color: Color, variant: Variant, number: u8) -> TdResult<Self> {
        if !(MIN_TICKET_NUMBER..=MAX_TICKET_NUMBER).contains(&number) {
            return Err(TdError::InvalidTicketNumber(number));
        }
        Ok(Self {
            color,
            variant,
            number,
        })
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Stable text key, e.g. `red-A-7`
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.color, self.variant, self.number)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}{}", self.color, self.number, self.variant)
    }
}

/// Unchecked wire form of [`TicketId`]
#[derive(Deserialize)]
struct RawTicket {
    color: Color,
    variant: Variant,
    number: u8,
}

impl TryFrom<RawTicket> for TicketId {
    type Error = TdError;

    fn try_from(raw: RawTicket) -> Result<Self, Self::Error> {
        TicketId::new(raw.color, raw.variant, raw.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycle_wraps() {
        assert_eq!(Color::Red.next(), Color::Blue);
        assert_eq!(Color::Yellow.next(), Color::White);
        assert_eq!(Color::White.next(), Color::Red);
        assert_eq!(Color::from_index(7), Color::Green);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("Red".parse::<Color>().unwrap(), Color::Red);
        assert_eq!(" white ".parse::<Color>().unwrap(), Color::White);
        assert!(matches!(
            "purple".parse::<Color>(),
            Err(TdError::UnknownColor(_))
        ));
    }

    #[test]
    fn test_variant_toggle() {
        assert_eq!(Variant::A.toggled(), Variant::B);
        assert_eq!(Variant::B.toggled(), Variant::A);
        assert_eq!("b".parse::<Variant>().unwrap(), Variant::B);
    }

    #[test]
    fn test_ticket_number_bounds() {
        assert!(TicketId::new(Color::Red, Variant::A, 1).is_ok());
        assert!(TicketId::new(Color::Red, Variant::A, 100).is_ok());
        assert!(matches!(
            TicketId::new(Color::Red, Variant::A, 0),
            Err(TdError::InvalidTicketNumber(0))
        ));
        assert!(TicketId::new(Color::Red, Variant::A, 101).is_err());
    }

    #[test]
    fn test_ticket_structural_equality() {
        let a = TicketId::new(Color::Blue, Variant::B, 12).unwrap();
        let b = TicketId::new(Color::Blue, Variant::B, 12).unwrap();
        let c = TicketId::new(Color::Blue, Variant::A, 12).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.key(), "blue-B-12");
        assert_eq!(a.to_string(), "blue 12B");
    }

    #[test]
    fn test_ticket_deserialize_validates() {
        let ok: TicketId =
            serde_json::from_str(r#"{"color":"green","variant":"A","number":5}"#).unwrap();
        assert_eq!(ok.number(), 5);

        let bad = serde_json::from_str::<TicketId>(r#"{"color":"green","variant":"A","number":0}"#);
        assert!(bad.is_err());
    }
}
