//! Sold-range configuration per (color, variant)

use serde::{Deserialize, Serialize};

use td_core::{Color, TdError, TdResult, Variant};

/// Raw range text for both variants of one color
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantRanges {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
}

impl VariantRanges {
    pub fn get(&self, variant: Variant) -> &str {
        match variant {
            Variant::A => &self.a,
            Variant::B => &self.b,
        }
    }

    fn get_mut(&mut self, variant: Variant) -> &mut String {
        match variant {
            Variant::A => &mut self.a,
            Variant::B => &mut self.b,
        }
    }
}

/// Sold ticket ranges, one free-text expression per (color, variant).
///
/// Serialized as `{ red: { A: "1-50", B: "" }, ... }`; absent entries are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeSpec {
    pub red: VariantRanges,
    pub blue: VariantRanges,
    pub green: VariantRanges,
    pub yellow: VariantRanges,
    pub white: VariantRanges,
}

impl RangeSpec {
    /// Empty configuration (nothing sold)
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw expression for a (color, variant)
    pub fn get(&self, color: Color, variant: Variant) -> &str {
        self.group(color).get(variant)
    }

    /// Replace one expression
    pub fn set(&mut self, color: Color, variant: Variant, expr: impl Into<String>) {
        *self.group_mut(color).get_mut(variant) = expr.into();
    }

    /// Builder form of [`RangeSpec::set`]
    pub fn with(mut self, color: Color, variant: Variant, expr: impl Into<String>) -> Self {
        self.set(color, variant, expr);
        self
    }

    /// Apply a `color:variant=expr` assignment, e.g. `red:A=1-50`
    pub fn apply_assignment(&mut self, assignment: &str) -> TdResult<()> {
        let (target, expr) = assignment.split_once('=').ok_or_else(|| {
            TdError::Config(format!("expected color:variant=ranges, got {:?}", assignment))
        })?;
        let (color, variant) = target.split_once(':').ok_or_else(|| {
            TdError::Config(format!("expected color:variant before '=', got {:?}", target))
        })?;

        self.set(color.parse()?, variant.parse()?, expr.trim());
        Ok(())
    }

    /// All (color, variant, expression) entries in cycling order
    pub fn entries(&self) -> impl Iterator<Item = (Color, Variant, &str)> + '_ {
        Color::ALL.into_iter().flat_map(move |color| {
            Variant::ALL
                .into_iter()
                .map(move |variant| (color, variant, self.get(color, variant)))
        })
    }

    /// True when no expression has any content
    pub fn is_blank(&self) -> bool {
        self.entries().all(|(_, _, expr)| expr.trim().is_empty())
    }

    fn group(&self, color: Color) -> &VariantRanges {
        match color {
            Color::Red => &self.red,
            Color::Blue => &self.blue,
            Color::Green => &self.green,
            Color::Yellow => &self.yellow,
            Color::White => &self.white,
        }
    }

    fn group_mut(&mut self, color: Color) -> &mut VariantRanges {
        match color {
            Color::Red => &mut self.red,
            Color::Blue => &mut self.blue,
            Color::Green => &mut self.green,
            Color::Yellow => &mut self.yellow,
            Color::White => &mut self.white,
        }
    }
}
