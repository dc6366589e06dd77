//! Range expressions: "1-50, 60-80" or "1, 5, 10-20"
//!
//! Parsing is best-effort: a malformed segment is dropped on its own and never
//! invalidates the rest of the expression.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use td_core::{MAX_TICKET_NUMBER, MIN_TICKET_NUMBER};

/// Outcome of parsing one expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeReport {
    /// Accepted numbers, ascending and deduplicated
    pub numbers: Vec<u8>,
    /// Trimmed text of every segment that was dropped
    pub dropped: Vec<String>,
}

impl RangeReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Parse an expression into ascending, deduplicated ticket numbers.
///
/// Pure: the same input always yields the same output.
pub fn parse_ranges(expr: &str) -> Vec<u8> {
    analyze_ranges(expr).numbers
}

/// Parse an expression and also report which segments were dropped
pub fn analyze_ranges(expr: &str) -> RangeReport {
    let mut report = RangeReport::default();
    if expr.trim().is_empty() {
        return report;
    }

    let mut numbers = BTreeSet::new();
    for segment in expr.split(',').map(str::trim) {
        if segment.is_empty() {
            continue;
        }
        match parse_segment(segment) {
            Some(range) => numbers.extend(range),
            None => {
                log::debug!("Dropping malformed range segment {:?}", segment);
                report.dropped.push(segment.to_string());
            }
        }
    }

    report.numbers = numbers.into_iter().collect();
    report
}

/// One segment: `start-end` or a single number
fn parse_segment(segment: &str) -> Option<RangeInclusive<u8>> {
    let (start, end) = if segment.contains('-') {
        // Pieces past the second are ignored ("1-5-9" reads as 1-5)
        let mut pieces = segment.split('-');
        let start = parse_leading_int(pieces.next()?)?;
        let end = parse_leading_int(pieces.next()?)?;
        (start, end)
    } else {
        let n = parse_leading_int(segment)?;
        (n, n)
    };

    if start > end || start < i64::from(MIN_TICKET_NUMBER) || end > i64::from(MAX_TICKET_NUMBER) {
        return None;
    }
    Some(start as u8..=end as u8)
}

/// Lenient integer read: optional sign, then the leading run of digits.
/// Trailing text is ignored ("12ab" is 12); no digits means no value.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'+') => (false, &text[1..]),
        Some(b'-') => (true, &text[1..]),
        _ => (false, text),
    };

    let digit_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }

    let value: i64 = rest[..digit_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Render ascending numbers back into compact form, e.g. `1-3, 5`
pub fn compact_ranges(numbers: &[u8]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = numbers.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while let Some(&next) = iter.peek() {
            if u16::from(next) != u16::from(end) + 1 {
                break;
            }
            end = next;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(parse_ranges("").is_empty());
        assert!(parse_ranges("   ").is_empty());
        assert!(parse_ranges("\t\n").is_empty());
    }

    #[test]
    fn test_ranges_and_singles() {
        assert_eq!(parse_ranges("1-3,5"), vec![1, 2, 3, 5]);
        assert_eq!(parse_ranges(" 10 - 12 , 1 "), vec![1, 10, 11, 12]);
        assert_eq!(parse_ranges("100"), vec![100]);
        assert_eq!(parse_ranges("1-100").len(), 100);
    }

    #[test]
    fn test_out_of_domain_segments_dropped() {
        assert!(parse_ranges("0-5").is_empty());
        assert!(parse_ranges("95-101").is_empty());
        assert!(parse_ranges("0").is_empty());
        assert!(parse_ranges("101").is_empty());
    }

    #[test]
    fn test_reversed_range_dropped() {
        assert!(parse_ranges("50-40").is_empty());
    }

    #[test]
    fn test_dedup_across_segments() {
        assert_eq!(parse_ranges("1-3, 1-3"), vec![1, 2, 3]);
        assert_eq!(parse_ranges("3, 1-4, 2"), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_malformed_segment_keeps_the_rest() {
        assert_eq!(parse_ranges("abc, 7, x-9, 20-21"), vec![7, 20, 21]);
        assert_eq!(parse_ranges("-5, 6"), vec![6]);
        assert_eq!(parse_ranges("1-3,,5"), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_lenient_integer_reading() {
        assert_eq!(parse_ranges("12ab"), vec![12]);
        assert_eq!(parse_ranges("+4"), vec![4]);
        assert_eq!(parse_ranges("1-5-9"), vec![1, 2, 3, 4, 5]);
        assert!(parse_ranges("99999999999999999999999").is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let expr = "5-9, 2, 7, 60-58, 99-100";
        assert_eq!(parse_ranges(expr), parse_ranges(expr));
    }

    #[test]
    fn test_analyze_reports_dropped() {
        let report = analyze_ranges("1-2, 0-5, foo , 50-40");
        assert_eq!(report.numbers, vec![1, 2]);
        assert_eq!(report.dropped, vec!["0-5", "foo", "50-40"]);
        assert!(!report.is_clean());
        assert!(analyze_ranges("1-2").is_clean());
    }

    #[test]
    fn test_compact_ranges() {
        assert_eq!(compact_ranges(&[]), "");
        assert_eq!(compact_ranges(&[1, 2, 3, 5]), "1-3, 5");
        assert_eq!(compact_ranges(&[7]), "7");
        assert_eq!(compact_ranges(&parse_ranges("60-80, 1-50")), "1-50, 60-80");
    }
}
