//! Drawable pool: sold tickets minus tickets already won

use std::collections::HashSet;

use td_core::{Color, TicketId, Variant};

use crate::range::parse_ranges;
use crate::range_spec::RangeSpec;

/// Every sold ticket that has not been won yet.
///
/// Order is colors in cycling order, then variant A before B, then ascending
/// numbers. The order carries no fairness meaning.
pub fn available_tickets<I>(ranges: &RangeSpec, won: I) -> Vec<TicketId>
where
    I: IntoIterator<Item = TicketId>,
{
    let won: HashSet<TicketId> = won.into_iter().collect();
    let mut available = Vec::new();

    for (color, variant, expr) in ranges.entries() {
        available.extend(
            parse_ranges(expr)
                .into_iter()
                .filter_map(|number| TicketId::new(color, variant, number).ok())
                .filter(|ticket| !won.contains(ticket)),
        );
    }

    available
}

/// Sold/available counts for one (color, variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolGroup {
    pub color: Color,
    pub variant: Variant,
    pub sold: usize,
    pub available: usize,
}

/// Per-group counts, in the same order as [`available_tickets`]
pub fn pool_counts<I>(ranges: &RangeSpec, won: I) -> Vec<PoolGroup>
where
    I: IntoIterator<Item = TicketId>,
{
    let won: Vec<TicketId> = won.into_iter().collect();

    ranges
        .entries()
        .map(|(color, variant, expr)| {
            let sold = parse_ranges(expr);
            let taken = sold
                .iter()
                .filter(|&&n| {
                    won.iter().any(|t| {
                        t.color() == color && t.variant() == variant && t.number() == n
                    })
                })
                .count();
            PoolGroup {
                color,
                variant,
                sold: sold.len(),
                available: sold.len() - taken,
            }
        })
        .collect()
}
